//! List sessions, timestamp groups, and marker state without encoding.

use std::path::PathBuf;

use quadcam_layout::LayoutId;
use quadcam_scanner::{
    eligible_clips, group_by_timestamp, is_marked, list_sessions, MIN_CLIPS_PER_SESSION,
};

pub fn run(source: PathBuf, layout_args: Vec<String>) -> anyhow::Result<()> {
    let layouts: Vec<LayoutId> = if layout_args.is_empty() {
        LayoutId::ALL.to_vec()
    } else {
        layout_args
            .iter()
            .map(|arg| arg.parse::<LayoutId>().map_err(anyhow::Error::from))
            .collect::<anyhow::Result<_>>()?
    };

    let sessions = list_sessions(&source)
        .map_err(|e| anyhow::anyhow!("Failed to read source root {}: {e}", source.display()))?;
    println!(
        "Found {} session(s) under {}",
        sessions.len(),
        source.display()
    );

    for session in &sessions {
        let clips = match eligible_clips(&session.path) {
            Ok(clips) => clips,
            Err(e) => {
                println!("\n{}: unreadable ({e})", session.name);
                continue;
            }
        };
        let groups = group_by_timestamp(&clips);
        let complete = groups.values().filter(|g| g.is_complete()).count();

        println!(
            "\n{}: {} clip(s), {} group(s), {} complete",
            session.name,
            clips.len(),
            groups.len(),
            complete
        );
        if clips.len() < MIN_CLIPS_PER_SESSION {
            println!("  under-populated: would be skipped");
            continue;
        }
        for id in &layouts {
            let state = if is_marked(&session.path, *id) {
                "processed"
            } else {
                "pending"
            };
            println!("  {id}: {state}");
        }
    }

    Ok(())
}
