//! Prober backed by the operating system's `ping` utility.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::{ProbeError, Prober};

/// Marker preceding the round-trip time in ping output.
const TIME_MARKER: &str = "time=";

/// Runs `ping -c 1 -W <wait> <target>` and reads the reported round-trip time.
#[derive(Debug, Clone)]
pub struct SystemPing {
    program: String,
    wait_secs: u32,
    timeout: Duration,
}

impl Default for SystemPing {
    fn default() -> Self {
        Self::new(1, Duration::from_secs(3))
    }
}

impl SystemPing {
    /// Create a prober that waits `wait_secs` for a reply and kills the
    /// utility if it has not exited after `timeout`.
    pub fn new(wait_secs: u32, timeout: Duration) -> Self {
        Self {
            program: "ping".to_string(),
            wait_secs,
            timeout,
        }
    }

    /// Use a different executable in place of `ping`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, target: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-c", "1", "-W"])
            .arg(self.wait_secs.to_string())
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Prober for SystemPing {
    async fn measure(&self, target: &str) -> Result<f64, ProbeError> {
        let output = timeout(self.timeout, self.command(target).output())
            .await
            .map_err(|_| ProbeError::Timeout)??;

        if !output.status.success() {
            return Err(ProbeError::Unsuccessful(output.status.code()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let latency = parse_latency(&stdout).ok_or(ProbeError::NoLatency)?;
        debug!(host = %target, latency_ms = latency, "ping reply");
        Ok(latency)
    }
}

/// Extract the round-trip time from ping output.
///
/// Takes the first line carrying `time=` and parses the number right after
/// it, so `time=12.3 ms`, `time=12.3ms` and `time=12` all yield a value.
pub fn parse_latency(output: &str) -> Option<f64> {
    output.lines().find_map(|line| {
        let (_, rest) = line.split_once(TIME_MARKER)?;
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let value: f64 = rest[..end].parse().ok()?;
        (value.is_finite() && value >= 0.0).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINUX_OUTPUT: &str = "PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.
64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=14.2 ms

--- 8.8.8.8 ping statistics ---
1 packets transmitted, 1 received, 0% packet loss, time 0ms
rtt min/avg/max/mdev = 14.231/14.231/14.231/0.000 ms
";

    #[test]
    fn test_parse_linux_output() {
        assert_eq!(parse_latency(LINUX_OUTPUT), Some(14.2));
    }

    #[test]
    fn test_parse_without_space_before_unit() {
        let output = "64 bytes from 1.1.1.1: icmp_seq=0 ttl=57 time=9.871ms";
        assert_eq!(parse_latency(output), Some(9.871));
    }

    #[test]
    fn test_parse_integer_time() {
        assert_eq!(parse_latency("reply from host: time=3 ms"), Some(3.0));
    }

    #[test]
    fn test_statistics_line_is_not_a_reply() {
        // "time 0ms" has no '=' and must not be mistaken for a reply
        let output = "1 packets transmitted, 0 received, 100% packet loss, time 0ms";
        assert_eq!(parse_latency(output), None);
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_latency(""), None);
        assert_eq!(parse_latency("time=abc ms"), None);
    }

    #[tokio::test]
    async fn test_missing_utility_is_spawn_error() {
        let prober = SystemPing::default().with_program("/nonexistent/ping-binary");
        let err = prober.measure("127.0.0.1").await.unwrap_err();
        assert!(matches!(err, ProbeError::Spawn(_)));
    }

    #[test]
    fn test_command_arguments() {
        let prober = SystemPing::new(1, Duration::from_secs(2));
        let cmd = prober.command("8.8.8.8");
        let args: Vec<_> = cmd.as_std().get_args().map(|a| a.to_string_lossy()).collect();
        assert_eq!(args, ["-c", "1", "-W", "1", "8.8.8.8"]);
        assert_eq!(cmd.as_std().get_program(), "ping");
    }
}
