//! Player event interpretation
//!
//! Turns session notifications into published states and follow-up queries.
//! Events for a player without a channel key are dropped, except `name`,
//! which is what assigns the key in the first place.

use lms_session::PlayerNotification;

use crate::artwork::{cache_buster, resolve_artwork, ArtworkResolution};
use crate::decoder::{decode_line, PlayerEvent};
use crate::engine::SyncEngine;
use crate::format::to_formatted_time;
use crate::model::{PlayState, PlayerId};
use crate::schema::{channel_schema, sanitize_channel_key, Field};

/// Query asking for the artwork of the current track
pub(crate) const ARTWORK_QUERY: &str = "status 0 1 tags:K";

impl SyncEngine {
    pub(crate) fn handle_notification(&mut self, player: PlayerId, notification: PlayerNotification) {
        if self.registry.get(&player).is_none() {
            // Player joined after discovery
            if announces_name(&notification) {
                self.registry.register(&player);
            } else {
                self.discover(&player);
            }
        }

        match notification {
            PlayerNotification::Line(tokens) => self.handle_line(&player, &tokens),
            PlayerNotification::Volume(volume) => {
                if let Some(channel) = self.channel_of(&player) {
                    self.publish(&channel, Field::Volume, volume);
                }
            }
            PlayerNotification::Power(power) => {
                if let Some(channel) = self.channel_of(&player) {
                    self.publish(&channel, Field::Power, power == "1");
                }
            }
            PlayerNotification::SignalStrength(strength) => {
                tracing::debug!("{} signal strength {}", player, strength);
            }
        }
    }

    fn handle_line(&mut self, player: &PlayerId, tokens: &[String]) {
        let event = decode_line(tokens);
        tracing::debug!("{} -> {:?}", player, event);

        if let PlayerEvent::Name(name) = &event {
            self.on_name(player, name);
            return;
        }

        let Some(channel) = self.channel_of(player) else {
            tracing::trace!("Dropping {:?} for unpublished player {}", event, player);
            return;
        };

        match event {
            PlayerEvent::Playlist { new_song } => self.on_playlist(player, new_song),
            PlayerEvent::Artist(artist) => {
                self.publish(&channel, Field::CurrentArtist, artist);
            }
            PlayerEvent::Album(album) => {
                self.publish(&channel, Field::CurrentAlbum, album);
            }
            PlayerEvent::CurrentTitle(title) => {
                self.publish(&channel, Field::CurrentTitle, title);
            }
            PlayerEvent::Muting(muted) => {
                self.publish(&channel, Field::Muting, muted);
            }
            PlayerEvent::Duration(seconds) => self.on_duration(player, &channel, seconds),
            PlayerEvent::Time(seconds) => self.on_time(player, &channel, seconds),
            PlayerEvent::Status(tokens) => self.on_status(player, &channel, &tokens),
            PlayerEvent::Mode(state) => self.on_mode(player, &channel, state),
            PlayerEvent::Name(_) | PlayerEvent::Unrecognized => {}
        }
    }

    fn on_playlist(&mut self, player: &PlayerId, new_song: bool) {
        for query in ["current_title ?", "artist ?", "album ?", "mode ?"] {
            self.send(player, query);
        }

        if !new_song {
            return;
        }
        let restarted = match self.registry.get_mut(player) {
            Some(device) => {
                let cancelled = device.cancel_ticker();
                if cancelled {
                    device.awaiting_artwork = true;
                }
                cancelled
            }
            None => false,
        };
        if restarted {
            self.send(player, "time ?");
            self.send(player, ARTWORK_QUERY);
        }
    }

    fn on_duration(&mut self, player: &PlayerId, channel: &str, seconds: f64) {
        let duration = seconds.floor() as i64;
        if let Some(device) = self.registry.get_mut(player) {
            device.duration_secs = duration;
        }
        self.publish(channel, Field::CurrentDuration, duration);
        self.publish(channel, Field::CurrentDurationText, to_formatted_time(duration));
    }

    /// Position update; only honoured when no ticker is running
    fn on_time(&mut self, player: &PlayerId, channel: &str, seconds: f64) {
        let Some(device) = self.registry.get_mut(player) else {
            return;
        };
        if device.has_ticker() {
            return;
        }

        let elapsed = seconds.floor() as i64;
        device.elapsed_secs = elapsed;
        device.ticker = Some(self.tickers.start(player.clone()));

        self.publish_elapsed(channel, elapsed);
    }

    fn on_status(&mut self, player: &PlayerId, channel: &str, tokens: &[String]) {
        let awaiting = self
            .registry
            .get(player)
            .is_some_and(|device| device.awaiting_artwork());
        if !awaiting {
            return;
        }

        match resolve_artwork(tokens, &self.config.server_host, self.http_port, player, cache_buster()) {
            ArtworkResolution::Resolved(url) => {
                if let Some(device) = self.registry.get_mut(player) {
                    device.awaiting_artwork = false;
                }
                self.publish(channel, Field::CurrentArtwork, url);
            }
            ArtworkResolution::Deferred => {
                tracing::debug!("HTTP port not known yet, deferring artwork for {}", player);
            }
        }
    }

    fn on_mode(&mut self, player: &PlayerId, channel: &str, state: PlayState) {
        self.publish(channel, Field::State, state);

        if state.is_playing() {
            self.send(player, "duration ?");
            let ticking = self.registry.get(player).is_some_and(|device| device.has_ticker());
            if !ticking {
                self.send(player, "time ?");
            }
        } else if let Some(device) = self.registry.get_mut(player) {
            if device.cancel_ticker() {
                tracing::debug!("Stopped ticker for {}", player);
            }
        }
    }

    /// First `name` event fixes the channel key and finalizes the channel
    ///
    /// Current power and volume are queried along with the metadata so the
    /// channel does not wait for the next change on the player.
    fn on_name(&mut self, player: &PlayerId, name: &str) {
        let key = sanitize_channel_key(name);
        let Some(channel) = self.registry.assign_channel(player, name, key) else {
            return;
        };

        tracing::info!("Publishing player {} ({:?}) as {}", player, name, channel);
        self.sync.declare(channel_schema(&channel, player, name));

        for query in [
            "power ?",
            "mixer volume ?",
            "mixer muting ?",
            "current_title ?",
            "artist ?",
            "album ?",
            "mode ?",
            ARTWORK_QUERY,
        ] {
            self.send(player, query);
        }
    }
}

/// Whether a notification is the player reporting a non-empty name
fn announces_name(notification: &PlayerNotification) -> bool {
    match notification {
        PlayerNotification::Line(tokens) => {
            tokens.first().map(String::as_str) == Some("name")
                && tokens.get(1).is_some_and(|name| !name.trim().is_empty())
        }
        _ => false,
    }
}
