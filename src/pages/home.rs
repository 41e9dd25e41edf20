use leptos::prelude::*;

use crate::components::topology::{Edge, Node, TopologyCanvas};

const TOPICS: &[&str] = &[
	"Graph Neural Networks",
	"Retrieval-Augmented Generation",
	"Protein Folding",
	"Causal Inference",
	"Federated Learning",
	"Diffusion Models",
	"Sparse Attention",
	"Program Synthesis",
];

/// Generate a synthetic citation graph: a few influential papers and many
/// low-relevance satellites citing them.
fn generate_sample_data(n: usize) -> (Vec<Node>, Vec<Edge>) {
	let nodes: Vec<Node> = (0..n)
		.map(|i| {
			let r = rand_simple(i);
			let score = if i % 7 == 0 { 0.6 + 0.4 * r } else { 0.55 * r };
			Node {
				id: format!("W{}", 2_700_000 + i * 37),
				title: format!("{} ({})", TOPICS[i % TOPICS.len()], i),
				score,
				year: 2015 + (i % 10) as i32,
				citations: (score * 900.0) as u32,
			}
		})
		.collect();

	let edges: Vec<Edge> = (1..n)
		.map(|i| {
			let target = (rand_simple(i * 3) * (i as f64)) as usize;
			Edge {
				source_id: nodes[i].id.clone(),
				target_id: nodes[target].id.clone(),
			}
		})
		.collect();

	(nodes, edges)
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Topology explorer page
#[component]
pub fn Home() -> impl IntoView {
	let (nodes, edges) = generate_sample_data(120);
	let lookup = StoredValue::new(nodes.clone());
	let nodes = Signal::derive(move || nodes.clone());
	let edges = Signal::derive(move || edges.clone());

	let selected = RwSignal::new(None::<String>);
	let hovered = RwSignal::new(None::<String>);

	let details = move || {
		let id = selected.get()?;
		let node = lookup.with_value(|all| all.iter().find(|n| n.id == id).cloned())?;
		Some(view! {
			<div class="paper-details">
				<h2>{node.title}</h2>
				<p>{format!("{} · {} citations · relevance {:.2}", node.year, node.citations, node.score)}</p>
				<code>{node.id}</code>
			</div>
		})
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph" style="width: 100vw; height: 100vh;">
				<TopologyCanvas
					nodes=nodes
					edges=edges
					selected=Signal::derive(move || selected.get())
					hovered=Signal::derive(move || hovered.get())
					on_select=Callback::new(move |id: Option<String>| selected.set(id))
					on_hover=Callback::new(move |id: Option<String>| hovered.set(id))
				/>
				<div class="graph-overlay">
					<h1>"Research Topology"</h1>
					<p class="subtitle">
						{move || {
							hovered
								.get()
								.map(|id| format!("Hovering {id}"))
								.unwrap_or_else(|| "Drag papers to reposition. Scroll to zoom. Drag background to pan.".into())
						}}
					</p>
					{details}
				</div>
			</div>
		</ErrorBoundary>
	}
}
