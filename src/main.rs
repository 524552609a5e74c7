use flowgraph_core::samples::{all_samples, build_sample};
use flowgraph_core::{Editor, EditorConfig};

fn main() -> Result<(), serde_json::Error> {
    // Set up logging; use RUST_LOG=debug to watch the editor work
    env_logger::init();

    let config = match std::env::var("FLOWGRAPH_CONFIG") {
        Ok(json) => EditorConfig::from_json(&json)?,
        Err(_) => EditorConfig::default(),
    };

    for info in all_samples() {
        let mut editor = Editor::with_config(config);
        editor.resize(egui::vec2(1200.0, 800.0));
        editor.load_document(build_sample(info.kind));

        let steps = editor.run_layout();
        let payload = editor.render_payload();
        log::info!(
            "{}: layout took {} steps; {} of {} nodes and {} links visible",
            info.name,
            steps,
            payload.nodes.len(),
            editor.graph().nodes().len(),
            payload.links.len()
        );

        println!("{}", editor.document().to_json()?);
    }
    Ok(())
}
