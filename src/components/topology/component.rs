use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::canvas;
use super::config::TopologyConfig;
use super::error::SurfaceError;
use super::interaction::HostEvent;
use super::types::{Edge, Node};
use super::view::TopologyView;

/// A view bound to a live 2D context.
struct Mounted {
	view: TopologyView,
	ctx: CanvasRenderingContext2d,
	pixel_ratio: f64,
}

impl Mounted {
	fn redraw(&self) {
		canvas::paint(&self.ctx, self.pixel_ratio, &self.view.frame());
	}
}

type Shared = Rc<RefCell<Option<Mounted>>>;
type JsCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

#[derive(Clone, Copy)]
struct HostCallbacks {
	on_select: Option<Callback<Option<String>>>,
	on_hover: Option<Callback<Option<String>>>,
}

impl HostCallbacks {
	fn dispatch(&self, event: Option<HostEvent>) {
		match event {
			Some(HostEvent::Select(id)) => {
				if let Some(cb) = self.on_select {
					cb.run(id);
				}
			}
			Some(HostEvent::Hover(id)) => {
				if let Some(cb) = self.on_hover {
					cb.run(id);
				}
			}
			None => {}
		}
	}
}

/// Apply `f` to the live view and repaint. The borrow is released before
/// returning so host callbacks may safely re-enter.
fn with_view<R>(shared: &Shared, f: impl FnOnce(&mut TopologyView) -> R) -> Option<R> {
	let mut guard = shared.borrow_mut();
	let mounted = guard.as_mut()?;
	if !mounted.view.is_alive() {
		return None;
	}
	let out = f(&mut mounted.view);
	mounted.redraw();
	Some(out)
}

/// Request the next animation frame unless one is already pending.
fn schedule_frame(animate: &JsCallback, handle: &Cell<Option<i32>>) {
	if handle.get().is_some() {
		return;
	}
	let Some(win) = web_sys::window() else {
		return;
	};
	if let Some(cb) = animate.borrow().as_ref() {
		handle.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
	}
}

fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn size_backing_store(canvas: &HtmlCanvasElement, (w, h): (f64, f64), pixel_ratio: f64) {
	canvas.set_width((w * pixel_ratio).round() as u32);
	canvas.set_height((h * pixel_ratio).round() as u32);
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, SurfaceError> {
	canvas
		.get_context("2d")
		.map_err(|e| SurfaceError::NoContext(format!("{e:?}")))?
		.ok_or_else(|| SurfaceError::NoContext("unsupported by this browser".into()))?
		.dyn_into::<CanvasRenderingContext2d>()
		.map_err(|_| SurfaceError::NoContext("unexpected context type".into()))
}

fn mount(canvas: &HtmlCanvasElement, mut config: TopologyConfig) -> Result<Mounted, SurfaceError> {
	let window = web_sys::window().ok_or(SurfaceError::NoWindow)?;
	canvas.parent_element().ok_or(SurfaceError::NotMounted)?;
	let size = container_size(canvas);
	let pixel_ratio = window.device_pixel_ratio().max(1.0);
	size_backing_store(canvas, size, pixel_ratio);
	let ctx = context_2d(canvas)?;
	config.layout.world_width = size.0;
	config.layout.world_height = size.1;
	info!("topology canvas mounted at {}x{} (dpr {pixel_ratio})", size.0, size.1);
	Ok(Mounted {
		view: TopologyView::new(config, size),
		ctx,
		pixel_ratio,
	})
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Force-directed topology of research nodes with pan, zoom, drag and hover.
#[component]
pub fn TopologyCanvas(
	#[prop(into)] nodes: Signal<Vec<Node>>,
	#[prop(into)] edges: Signal<Vec<Edge>>,
	#[prop(into, optional)] selected: MaybeProp<String>,
	#[prop(into, optional)] hovered: MaybeProp<String>,
	#[prop(into, optional)] on_select: Option<Callback<Option<String>>>,
	#[prop(into, optional)] on_hover: Option<Callback<Option<String>>>,
	#[prop(optional)] config: TopologyConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let callbacks = HostCallbacks {
		on_select,
		on_hover,
	};
	let shared: Shared = Rc::new(RefCell::new(None));
	let animate: JsCallback = Rc::new(RefCell::new(None));
	let frame_handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let resize_cb: JsCallback = Rc::new(RefCell::new(None));
	let (shared_init, animate_init, handle_init, resize_init) = (
		shared.clone(),
		animate.clone(),
		frame_handle.clone(),
		resize_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let mut mounted = match mount(&canvas, config.clone()) {
			Ok(m) => m,
			Err(e) => {
				error!("topology canvas unavailable: {e}");
				return;
			}
		};
		mounted
			.view
			.set_data(nodes.get_untracked(), &edges.get_untracked());
		mounted.view.set_selected(selected.get_untracked());
		mounted.view.set_host_hovered(hovered.get_untracked());
		mounted.redraw();
		*shared_init.borrow_mut() = Some(mounted);

		let Some(window) = web_sys::window() else {
			return;
		};

		let (shared_resize, canvas_resize) = (shared_init.clone(), canvas.clone());
		*resize_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let size = container_size(&canvas_resize);
			let pixel_ratio = win.device_pixel_ratio().max(1.0);
			size_backing_store(&canvas_resize, size, pixel_ratio);
			if let Some(m) = shared_resize.borrow_mut().as_mut() {
				m.pixel_ratio = pixel_ratio;
				m.view.resize(size.0, size.1);
				if m.view.is_alive() {
					m.redraw();
				}
			}
		}));
		if let Some(ref cb) = *resize_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (shared_anim, animate_inner, handle_inner) =
			(shared_init.clone(), animate_init.clone(), handle_init.clone());
		// The chain ends once the layout settles; `set_data` restarts it.
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			handle_inner.set(None);
			let pending = {
				let mut guard = shared_anim.borrow_mut();
				let Some(m) = guard.as_mut() else {
					return;
				};
				if !m.view.is_alive() {
					return;
				}
				if m.view.advance() {
					m.redraw();
				}
				m.view.is_simulating()
			};
			if pending {
				schedule_frame(&animate_inner, &handle_inner);
			}
		}));
		schedule_frame(&animate_init, &handle_init);
	});

	// A new node or edge list reseeds the layout and restarts relaxation.
	let (shared_data, animate_data, handle_data) = (shared.clone(), animate.clone(), frame_handle.clone());
	Effect::new(move |_| {
		let (nodes, edges) = (nodes.get(), edges.get());
		let restarted = with_view(&shared_data, |view| {
			view.set_data(nodes, &edges);
			view.is_simulating()
		});
		if restarted == Some(true) {
			schedule_frame(&animate_data, &handle_data);
		}
	});

	let shared_props = shared.clone();
	Effect::new(move |_| {
		let (selected, hovered) = (selected.get(), hovered.get());
		with_view(&shared_props, |view| {
			view.set_selected(selected);
			view.set_host_hovered(hovered);
		});
	});

	let teardown = SendWrapper::new((shared.clone(), animate, frame_handle, resize_cb));
	on_cleanup(move || {
		let (shared, animate, frame_handle, resize_cb) = teardown.take();
		if let Some(m) = shared.borrow_mut().as_mut() {
			m.view.teardown();
		}
		if let Some(win) = web_sys::window() {
			if let Some(handle) = frame_handle.take() {
				let _ = win.cancel_animation_frame(handle);
			}
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		animate.borrow_mut().take();
		resize_cb.borrow_mut().take();
		shared.borrow_mut().take();
	});

	let shared_md = shared.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let event = with_view(&shared_md, |view| view.pointer_down(x, y)).flatten();
		callbacks.dispatch(event);
	};

	let shared_mm = shared.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let event = with_view(&shared_mm, |view| view.pointer_move(x, y)).flatten();
		callbacks.dispatch(event);
	};

	let shared_mu = shared.clone();
	let on_mouseup = move |_: MouseEvent| {
		with_view(&shared_mu, |view| view.pointer_up());
	};

	let shared_ml = shared.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let event = with_view(&shared_ml, |view| view.pointer_leave()).flatten();
		callbacks.dispatch(event);
	};

	let shared_wh = shared.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		with_view(&shared_wh, |view| view.wheel(ev.delta_y(), x, y));
	};

	let (shared_zi, shared_zo, shared_rv) = (shared.clone(), shared.clone(), shared);
	let zoom_in = move |_: MouseEvent| {
		with_view(&shared_zi, |view| view.zoom_in());
	};
	let zoom_out = move |_: MouseEvent| {
		with_view(&shared_zo, |view| view.zoom_out());
	};
	let reset_view = move |_: MouseEvent| {
		with_view(&shared_rv, |view| view.reset_view());
	};

	view! {
		<div class="topology-canvas" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; width: 100%; height: 100%; cursor: grab;"
			/>
			<div class="topology-controls" style="position: absolute; top: 12px; right: 12px; display: flex; gap: 4px;">
				<button title="Zoom in" on:click=zoom_in>"+"</button>
				<button title="Zoom out" on:click=zoom_out>"−"</button>
				<button title="Reset view" on:click=reset_view>"Reset"</button>
			</div>
		</div>
	}
}
