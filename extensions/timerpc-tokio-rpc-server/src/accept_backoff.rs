use std::io;
use std::time::Duration;

const MIN_ACCEPT_BACKOFF: Duration = Duration::from_millis(5);
const MAX_ACCEPT_BACKOFF: Duration = Duration::from_secs(1);

/// True for accept failures that leave the listening socket usable: a peer
/// that gave up before being accepted, or a passing shortage of descriptors
/// or buffers.
pub(crate) fn is_transient_accept_error(err: &io::Error) -> bool {
    match err.kind() {
        io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::Interrupted
        | io::ErrorKind::WouldBlock
        | io::ErrorKind::TimedOut
        | io::ErrorKind::OutOfMemory => true,
        _ => err.raw_os_error().is_some_and(is_resource_exhaustion),
    }
}

#[cfg(unix)]
fn is_resource_exhaustion(code: i32) -> bool {
    matches!(
        code,
        libc::EMFILE | libc::ENFILE | libc::ENOBUFS | libc::ENOMEM
    )
}

#[cfg(not(unix))]
fn is_resource_exhaustion(code: i32) -> bool {
    // WSAEMFILE, WSAENOBUFS
    matches!(code, 10024 | 10055)
}

/// Delay between accept retries. Starts at 5 ms and doubles up to 1 s until a
/// connection is accepted again.
#[derive(Debug, Default)]
pub(crate) struct AcceptBackoff {
    delay: Option<Duration>,
}

impl AcceptBackoff {
    pub(crate) fn next_delay(&mut self) -> Duration {
        let delay = match self.delay {
            None => MIN_ACCEPT_BACKOFF,
            Some(delay) => (delay * 2).min(MAX_ACCEPT_BACKOFF),
        };
        self.delay = Some(delay);
        delay
    }

    pub(crate) fn reset(&mut self) {
        self.delay = None;
    }
}
