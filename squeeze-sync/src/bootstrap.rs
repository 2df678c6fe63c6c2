//! Session bootstrap: player discovery and the one-time HTTP port query

use crate::engine::SyncEngine;
use crate::interpreter::ARTWORK_QUERY;
use crate::model::PlayerId;

/// Server preference holding the web interface port
pub const HTTP_PORT_PREF: &str = "httpport";

impl SyncEngine {
    /// Register the players listed by the session and ask for their names
    pub(crate) fn on_ready(&mut self, players: Vec<PlayerId>) {
        if !self.httpport_requested {
            self.httpport_requested = true;
            self.commands.query_server_pref(HTTP_PORT_PREF);
        }

        tracing::info!("Session ready with {} players", players.len());
        for player in &players {
            self.discover(player);
        }
    }

    /// Register `player` if needed and request its name until one is known
    pub(crate) fn discover(&mut self, player: &PlayerId) {
        let device = self.registry.register(player);
        if device.display_name().is_none() {
            self.send(player, "name ?");
        }
    }

    pub(crate) fn on_server_pref(&mut self, name: &str, value: &str) {
        if name != HTTP_PORT_PREF || self.http_port.is_some() {
            return;
        }

        match value.trim().parse::<u16>() {
            Ok(port) => {
                tracing::info!("httpport: {}", port);
                self.http_port = Some(port);
                self.retry_deferred_artwork();
            }
            Err(e) => tracing::warn!("Ignoring invalid httpport {:?}: {}", value, e),
        }
    }

    /// Ask again for artwork that was waiting on the HTTP port
    fn retry_deferred_artwork(&mut self) {
        let waiting: Vec<PlayerId> = self
            .registry
            .all()
            .into_iter()
            .filter(|device| device.channel_key().is_some() && device.awaiting_artwork())
            .map(|device| device.id().clone())
            .collect();

        for player in waiting {
            self.send(&player, ARTWORK_QUERY);
        }
    }
}
