use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::serve;

use super::super::Container;

pub struct ServeController<'a> {
    container: &'a Container,
}

impl<'a> ServeController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn serve(&self, port: u16, public: bool) -> Result<String> {
        let ip = if public {
            warn!("Binding to 0.0.0.0: the relay endpoint is reachable from the network");
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        };

        let relay = Arc::new(self.container.relay_use_case()?);
        serve(relay, SocketAddr::new(ip, port)).await?;
        Ok("Relay endpoint stopped.".to_string())
    }
}
