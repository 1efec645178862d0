//! CLI tests: argument parsing, registry behavior, command output.

use super::{parse_from, Context, Invocation, Registry};
use shellsy_core::config::ShellsyConfig;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

pub(super) fn registry() -> Arc<Registry> {
    Arc::new(Registry::builtin().unwrap())
}

pub(super) fn parse(args: &[&str]) -> Invocation {
    parse_from(&registry(), args).unwrap()
}

pub(super) fn parse_err(args: &[&str]) -> clap::Error {
    parse_from(&registry(), args).unwrap_err()
}

/// Run `args` through the registry with default config and capture stdout.
pub(super) fn execute(args: &[&str]) -> anyhow::Result<String> {
    execute_with(ShellsyConfig::default(), args)
}

pub(super) fn execute_with(cfg: ShellsyConfig, args: &[&str]) -> anyhow::Result<String> {
    let registry = registry();
    let inv = parse_from(&registry, args).unwrap();
    let command = registry.get(&inv.name).expect("registered");
    let ctx = Context::new(cfg, Arc::clone(&registry));
    let mut out = Vec::new();
    command.execute(&ctx, &inv.matches, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

/// Answer one HTTP request with `200 OK` and `body`. Returns the base URL and
/// a handle that yields the request target.
pub(super) fn serve_once(body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let n = stream.read(&mut buf).unwrap();
        let request = String::from_utf8_lossy(&buf[..n]).to_string();
        let target = request.split_whitespace().nth(1).unwrap_or("").to_string();
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
        .unwrap();
        target
    });
    (base, handle)
}
