use std::{env, process::ExitCode};

use anyhow::Result;
use tracing::{error, info};

use nest_webrtc::{
    config::Credentials, session::CameraSession, signaling::SdmClient, tracing_helper,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_helper::init_tracing();
    let _ = dotenvy::dotenv();

    let result = match env::args().nth(1).as_deref() {
        None => stream().await,
        Some("devices") => list_devices().await,
        Some(command) => {
            eprintln!("unknown command: {} (expected no command, or \"devices\")", command);
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = result {
        error!("{:#}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn stream() -> Result<()> {
    let credentials = Credentials::from_env()?;
    credentials.require_device_id()?;

    let client = SdmClient::new(credentials);
    let mut session = CameraSession::new().await?;
    session.negotiate(&client).await?;

    let track = session.wait_for_track().await?;
    // Hand-off point: an external consumer takes the track from here.
    info!("track received: kind={} codec={}", track.kind(), track.mime_type());
    Ok(())
}

async fn list_devices() -> Result<()> {
    let credentials = Credentials::from_env()?;
    let client = SdmClient::new(credentials);
    let devices = client.list_devices().await?;
    if devices.is_empty() {
        println!("no devices found");
        return Ok(());
    }
    for device in devices {
        let camera = if device.is_camera() { " (camera)" } else { "" };
        println!("{}  {}{}", device.name(), device.device_type(), camera);
    }
    Ok(())
}
