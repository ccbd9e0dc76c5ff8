//! Check encoder availability and configured defaults.

use quadcam_common::config::AppConfig;
use quadcam_layout::LayoutId;
use quadcam_render::FfmpegEncoder;

pub fn run(config: AppConfig) -> anyhow::Result<()> {
    println!("Quadcam System Check");
    println!("{}", "=".repeat(50));

    let encoder_ok = FfmpegEncoder::is_available(&config.encoder.binary);
    if encoder_ok {
        println!("[OK] Encoder binary: {}", config.encoder.binary);
    } else {
        println!("[WARN] Encoder binary not found: {}", config.encoder.binary);
    }

    println!(
        "[OK] Layouts: {}",
        LayoutId::ALL
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    println!();
    println!("Encode settings:");
    println!("  Frame rate: {}", config.encoder.fps);
    println!("  Preset: {}", config.encoder.preset);
    println!("  Video bitrate: {}", config.encoder.video_bitrate);
    println!("  CRF: {}", config.encoder.crf);
    println!("  Keyframe interval: {}", config.encoder.keyframe_interval);
    println!(
        "  Profile/level: {} / {}",
        config.encoder.profile, config.encoder.level
    );
    println!("  Default concurrency: {}", config.jobs);

    println!();
    if encoder_ok {
        println!("Quadcam is ready.");
    } else {
        println!("Install ffmpeg or point encoder.binary at it in the config.");
    }

    Ok(())
}
