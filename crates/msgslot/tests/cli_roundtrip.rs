#![cfg(unix)]

use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/msgslot-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn wait_for_service(path: &Path, timeout: Duration) {
    let start = Instant::now();
    loop {
        if UnixStream::connect(path).is_ok() {
            return;
        }
        assert!(
            start.elapsed() < timeout,
            "service did not come up at {}",
            path.display()
        );
        thread::sleep(Duration::from_millis(25));
    }
}

fn msgslot(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_msgslot"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("msgslot binary should run")
}

#[test]
fn send_and_recv_through_the_binaries() {
    let dir = unique_temp_dir("roundtrip");
    let sock = dir.join("svc.sock");
    let sock_str = sock.to_str().expect("socket path should be utf-8");

    let mut server = Command::new(env!("CARGO_BIN_EXE_msgslot"))
        .arg("--log-level")
        .arg("error")
        .arg("serve")
        .arg(&sock)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("serve should start");
    wait_for_service(&sock, Duration::from_secs(3));

    // Plain write, raw read back.
    let sent = msgslot(&[
        "send", sock_str, "--slot", "3", "--channel", "7", "--data", "hello",
    ]);
    assert!(sent.status.success(), "send failed: {sent:?}");

    let received = msgslot(&[
        "--format", "raw", "recv", sock_str, "--slot", "3", "--channel", "7",
    ]);
    assert!(received.status.success(), "recv failed: {received:?}");
    assert_eq!(received.stdout, b"hello");

    // Censored overwrite of the same channel is what later readers see.
    let censored = msgslot(&[
        "send", sock_str, "--slot", "3", "--channel", "7", "--censor", "1", "--data", "hello",
    ]);
    assert!(censored.status.success(), "censored send failed: {censored:?}");

    let received = msgslot(&[
        "--format", "raw", "recv", sock_str, "--slot", "3", "--channel", "7",
    ]);
    assert!(received.status.success());
    assert_eq!(received.stdout, b"he#lo");

    // Reading a channel nothing ever wrote to is a data error, with
    // nothing on stdout.
    let missing = msgslot(&[
        "--format", "raw", "recv", sock_str, "--slot", "3", "--channel", "8",
    ]);
    assert_eq!(missing.status.code(), Some(60));
    assert!(missing.stdout.is_empty());

    // Channel 0 is rejected before anything is written.
    let reserved = msgslot(&[
        "send", sock_str, "--slot", "3", "--channel", "0", "--data", "nope",
    ]);
    assert_eq!(reserved.status.code(), Some(64));

    let _ = server.kill();
    let _ = server.wait();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn send_without_message_fails_fast() {
    // No server needed; the usage error comes before any connection.
    let out = msgslot(&["send", "/tmp/nowhere.sock", "--slot", "0", "--channel", "1"]);
    assert_eq!(out.status.code(), Some(64));
}

#[test]
fn version_prints_crate_version() {
    let out = msgslot(&["version"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).expect("version output should be utf-8");
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
