//! TCP connection setup.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use dict_config::ServerEndpoint;
use tracing::debug;

use crate::SessionOptions;
use crate::error::DictError;
use crate::transport::TRANSPORT_TARGET;

/// Opens a TCP stream to `endpoint` with the deadlines from `options` applied.
pub(crate) fn open(
    endpoint: &ServerEndpoint,
    options: &SessionOptions,
) -> Result<TcpStream, DictError> {
    let host = endpoint.host().to_owned();
    let addresses = resolve(endpoint).map_err(|source| DictError::Resolve {
        host: host.clone(),
        source,
    })?;

    let mut last_error = None;
    for address in addresses {
        debug!(
            target: TRANSPORT_TARGET,
            endpoint = %endpoint,
            %address,
            "connecting"
        );
        let attempt = match options.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&address, timeout),
            None => TcpStream::connect(address),
        };
        match attempt {
            Ok(stream) => {
                configure(&stream, options).map_err(|source| DictError::Connect {
                    host: host.clone(),
                    source,
                })?;
                return Ok(stream);
            }
            Err(error) => last_error = Some(error),
        }
    }

    Err(DictError::Connect {
        host,
        source: last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses")
        }),
    })
}

fn resolve(endpoint: &ServerEndpoint) -> io::Result<Vec<SocketAddr>> {
    let addresses: Vec<SocketAddr> = (endpoint.host(), endpoint.port())
        .to_socket_addrs()?
        .collect();
    if addresses.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "no resolved addresses",
        ));
    }
    Ok(addresses)
}

fn configure(stream: &TcpStream, options: &SessionOptions) -> io::Result<()> {
    stream.set_read_timeout(options.read_timeout)?;
    stream.set_write_timeout(options.read_timeout)?;
    stream.set_nodelay(true)
}
