use std::sync::atomic::{AtomicBool, Ordering};

use super::traits::ConnectivitySignal;

/// Connectivity flag set by the host application (or a test).
///
/// Platforms that already observe network state push it in through
/// [`ManualConnectivity::set_connected`].
#[derive(Debug)]
pub struct ManualConnectivity {
    connected: AtomicBool,
}

impl ManualConnectivity {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
        }
    }

    pub fn online() -> Self {
        Self::new(true)
    }

    pub fn offline() -> Self {
        Self::new(false)
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl Default for ManualConnectivity {
    fn default() -> Self {
        Self::online()
    }
}

impl ConnectivitySignal for ManualConnectivity {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use probe::TcpProbeConnectivity;

#[cfg(not(target_arch = "wasm32"))]
mod probe {
    use log::debug;
    use std::net::{TcpStream, ToSocketAddrs};
    use std::time::Duration;

    use super::ConnectivitySignal;

    /// Considers the device connected when a TCP handshake with `target`
    /// (`host:port`) completes within the timeout.
    ///
    /// Blocking: each call resolves the host and dials every resolved address
    /// in turn until one answers.
    #[derive(Debug, Clone)]
    pub struct TcpProbeConnectivity {
        target: String,
        timeout: Duration,
    }

    impl TcpProbeConnectivity {
        pub fn new(target: impl Into<String>, timeout: Duration) -> Self {
            Self {
                target: target.into(),
                timeout,
            }
        }

        pub fn target(&self) -> &str {
            &self.target
        }
    }

    impl ConnectivitySignal for TcpProbeConnectivity {
        fn is_connected(&self) -> bool {
            let addrs = match self.target.to_socket_addrs() {
                Ok(addrs) => addrs,
                Err(e) => {
                    debug!("Connectivity probe could not resolve {}: {e}", self.target);
                    return false;
                }
            };
            for addr in addrs {
                if TcpStream::connect_timeout(&addr, self.timeout).is_ok() {
                    return true;
                }
            }
            debug!("Connectivity probe to {} failed", self.target);
            false
        }
    }
}
