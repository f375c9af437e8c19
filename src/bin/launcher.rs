use ink_keypad::common::config_files::install_dir;
use ink_keypad::launcher::{pass_through_document, panel_binary_path, spawn_panel, LaunchRequest};

fn main() -> anyhow::Result<()> {
    // stdout belongs to the host document; tracing writes to stderr.
    ink_keypad::logging::init(false, None);

    let request = LaunchRequest::from_args(std::env::args().skip(1));
    let binary = panel_binary_path(&install_dir());
    if let Err(e) = spawn_panel(&binary, request.variant) {
        tracing::error!("could not start panel: {e:#}");
    }

    if let Some(document) = &request.document {
        pass_through_document(document, &mut std::io::stdout().lock())?;
    }
    Ok(())
}
