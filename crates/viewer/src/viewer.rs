//! Local viewer handle: state, address, and URL

// standard library
use std::net::{SocketAddr, ToSocketAddrs};
use std::thread;
use std::time::Duration;

// crate modules
use crate::error::{Error, Result};
use crate::state::ViewerState;

// voxtools modules
use voxtools_utils::f;

// external crates
use log::{debug, info};
use uuid::Uuid;

/// A viewer session owned by this process
///
/// Nothing is served from here. The address is where an external server is
/// expected to serve the state, and [url()](LocalViewer::url) is the page that
/// server would show for this session. The state is modified through
/// [txn()](LocalViewer::txn) and exported with
/// [ViewerState::write_json()](crate::ViewerState::write_json).
///
/// ```rust, no_run
/// # use voxtools_viewer::LocalViewer;
/// let mut viewer = LocalViewer::new("127.0.0.1:9000").unwrap();
/// println!("{}", viewer.url());
///
/// viewer.txn(|state| state.dimensions = None);
/// viewer.state().write_json("viewer_state.json").unwrap();
/// viewer.wait_forever();
/// ```
#[derive(Debug)]
pub struct LocalViewer {
    state: ViewerState,
    address: SocketAddr,
    token: String,
}

// Public API
impl LocalViewer {
    /// New session with an empty state, to be served at `address`
    ///
    /// The address must name a concrete port, since no socket is opened that
    /// could resolve port `0`.
    pub fn new(address: &str) -> Result<Self> {
        let address = address
            .to_socket_addrs()
            .ok()
            .and_then(|mut a| a.next())
            .filter(|a| a.port() != 0)
            .ok_or_else(|| Error::InvalidBindAddress(address.to_string()))?;

        let token = Uuid::new_v4().simple().to_string();
        debug!("Viewer session {token} for {address}");

        Ok(Self {
            state: ViewerState::default(),
            address,
            token,
        })
    }

    /// Apply a set of changes to the state in one go
    ///
    /// Returns whatever the closure returns, so fallible updates can use `?`
    /// inside and propagate out.
    pub fn txn<F, R>(&mut self, update: F) -> R
    where
        F: FnOnce(&mut ViewerState) -> R,
    {
        update(&mut self.state)
    }

    /// Current state
    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Address reserved for the external server
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Session token embedded in the URL
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Viewer page for this session on the external server
    pub fn url(&self) -> String {
        f!("http://{}/v/{}/", self.address, self.token)
    }

    /// Block the current thread until the process is interrupted
    pub fn wait_forever(&self) -> ! {
        info!("Holding viewer session {}, interrupt to stop", self.token);
        loop {
            thread::sleep(Duration::from_secs(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens() {
        let viewer = LocalViewer::new("127.0.0.1:9000").unwrap();
        let token = viewer.token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

        let other = LocalViewer::new("127.0.0.1:9000").unwrap();
        assert_ne!(other.token(), token);
    }

    #[test]
    fn invalid_address() {
        let result = LocalViewer::new("not an address");
        assert!(matches!(result, Err(Error::InvalidBindAddress(_))));

        // no socket is opened, so there is nothing to pick a free port
        let result = LocalViewer::new("127.0.0.1:0");
        assert!(matches!(result, Err(Error::InvalidBindAddress(_))));
    }

    #[test]
    fn url_format() {
        let viewer = LocalViewer::new("127.0.0.1:9000").unwrap();
        assert_eq!(viewer.address().port(), 9000);
        assert_eq!(viewer.url(), f!("http://127.0.0.1:9000/v/{}/", viewer.token()));
    }

    #[test]
    fn no_socket_is_held() {
        // a second session for the same address is fine
        let first = LocalViewer::new("127.0.0.1:9000").unwrap();
        let second = LocalViewer::new("127.0.0.1:9000").unwrap();
        assert_eq!(first.address(), second.address());
    }

    #[test]
    fn transactions() {
        let mut viewer = LocalViewer::new("127.0.0.1:9000").unwrap();
        let count = viewer.txn(|state| state.layers().len());
        assert_eq!(count, 0);
    }
}
