use may::coroutine::JoinHandle;
use may_minihttp::{HttpServerWithHeaders, HttpService};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Header slots per request; gateways and proxies add a fair number.
const MAX_HEADERS: usize = 32;

/// Runs an [`HttpService`] on the `may` coroutine runtime.
///
/// Every accepted connection is served on its own coroutine with its own clone
/// of the service.
pub struct HttpServer<T>(pub T);

/// A running server.
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the listen address accepts a connection, for at most 250ms.
    pub fn wait_ready(&self) -> io::Result<()> {
        self.wait_ready_within(Duration::from_millis(250))
    }

    pub fn wait_ready_within(&self, timeout: Duration) -> io::Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if TcpStream::connect(self.addr).is_ok() {
                debug!(addr = %self.addr, "server ready");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("server on {} not ready after {timeout:?}", self.addr),
                ));
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Cancel the accept loop and wait for it to exit.
    pub fn stop(self) {
        let ServerHandle { addr, handle } = self;
        // SAFETY: may marks cancel() unsafe because a cancelled coroutine must
        // not be resumed; the handle is consumed and joined right here.
        unsafe {
            handle.coroutine().cancel();
        }
        if handle.join().is_err() {
            debug!(%addr, "server coroutine ended by cancellation");
        }
        info!(%addr, "server stopped");
    }

    /// Block until the server coroutine finishes.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    /// Bind the first address `addr` resolves to and start accepting.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let Some(addr) = addr.to_socket_addrs()?.next() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "address resolved to nothing",
            ));
        };
        let handle = HttpServerWithHeaders::<_, MAX_HEADERS>(self.0).start(addr)?;
        info!(%addr, "server started");
        Ok(ServerHandle { addr, handle })
    }
}
