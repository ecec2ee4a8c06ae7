use std::io::{self, BufReader};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::thread;

use log::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::dictionary::SharedDictionary;
use crate::error::SessionError;
use crate::session::{Outcome, Session};

/// Accepts connections and runs one [`Session`] per connection.
pub struct Server {
    listener: TcpListener,
    dictionary: SharedDictionary,
    config: ServerConfig,
}

impl Server {
    pub fn bind(config: ServerConfig, dictionary: SharedDictionary) -> io::Result<Self> {
        let listener = TcpListener::bind(&config.bind)?;
        info!("listening on {}", listener.local_addr()?);
        Ok(Server {
            listener,
            dictionary,
            config,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves forever. A failed accept or session is logged and skipped.
    pub fn run(&self) {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => self.dispatch(stream),
                Err(err) => error!("accept failed: {err}"),
            }
        }
    }

    /// Serves exactly `count` connections, then returns.
    pub fn serve(&self, count: usize) -> io::Result<()> {
        for _ in 0..count {
            let (stream, _) = self.listener.accept()?;
            self.dispatch(stream);
        }
        Ok(())
    }

    fn dispatch(&self, stream: TcpStream) {
        if self.config.concurrent {
            let dictionary = self.dictionary.clone();
            let config = self.config.clone();
            thread::spawn(move || handle_connection(stream, dictionary, &config));
        } else {
            handle_connection(stream, self.dictionary.clone(), &self.config);
        }
    }
}

/// Runs one session over `stream` and closes it.
pub fn handle_connection(stream: TcpStream, dictionary: SharedDictionary, config: &ServerConfig) {
    let peer = stream
        .peer_addr()
        .map_or_else(|_| "unknown peer".to_string(), |addr| addr.to_string());
    info!("client connected: {peer}");

    match run_session(&stream, dictionary, config) {
        Ok(Outcome::Completed { .. }) => info!("{peer}: completed"),
        Ok(Outcome::Aborted) => info!("{peer}: quit by client"),
        Ok(Outcome::Rejected(err)) => info!("{peer}: input rejected ({err})"),
        Err(err) => warn!("{peer}: session failed: {err}"),
    }

    if let Err(err) = stream.shutdown(Shutdown::Both) {
        // already gone if the client hung up first
        debug!("{peer}: shutdown: {err}");
    }
}

fn run_session(
    stream: &TcpStream,
    dictionary: SharedDictionary,
    config: &ServerConfig,
) -> Result<Outcome, SessionError> {
    stream.set_read_timeout(config.read_timeout())?;
    let reader = BufReader::new(stream.try_clone()?);
    Session::new(reader, stream, dictionary, config.limits()).run()
}
