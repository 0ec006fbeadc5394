mod config;
mod constants;
mod messages;
mod packet;
mod pad_source;
mod pad_state;
mod request;
mod sample;
mod server;

use anyhow::{Context, Result};
use config::AppConfig;
use constants::TICK_INTERVAL;
use pad_source::PadSource;
use sample::InputSample;
use server::DsuServer;
use std::{
    net::UdpSocket,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Instant,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("could not load config, using defaults: {e}");
        AppConfig::default()
    });
    if let Err(e) = cfg.save() {
        log::warn!("could not persist config: {e}");
    }

    let mut socket = UdpSocket::bind(("0.0.0.0", cfg.listen_port))
        .with_context(|| format!("binding UDP port {}", cfg.listen_port))?;
    socket
        .set_nonblocking(true)
        .context("setting socket non-blocking")?;
    log::info!("listening for DSU clients on port {}", cfg.listen_port);

    let mut pad = PadSource::discover((&cfg).into());
    if pad.is_none() {
        log::warn!("no gamepad connected, serving neutral input");
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("shutting down");
        r.store(false, Ordering::SeqCst);
    })
    .context("setting Ctrl-C handler")?;

    let mut server = DsuServer::new();
    let start = Instant::now();

    while running.load(Ordering::SeqCst) {
        let now_us = start.elapsed().as_micros() as u64;
        let sample = match pad.as_mut() {
            Some(pad) => pad.sample(now_us),
            None => InputSample::neutral(now_us),
        };

        server.tick(&mut socket, now_us, &sample);
        thread::sleep(TICK_INTERVAL);
    }

    Ok(())
}
