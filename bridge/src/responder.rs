//! Event dispatch for the request path
//!
//! Maps a parsed request to a protocol response. GET requests for known
//! events get scripted `200 OK` answers; notifications and unknown
//! events get `204 No Content`; a request without an `ID` header is a
//! `400 Bad Request`.

use std::collections::HashMap;

use shiori_core::{script, GhostInfo, Method, Request, Response};
use tracing::{debug, warn};

use crate::dialog;

/// Stateful responder owned by a bridge instance
///
/// Keeps a rotation counter per event so repeated requests cycle through
/// the dialog sets. Rotation starts at zero, so the first answer for any
/// event is fixed.
#[derive(Debug, Default)]
pub struct Responder {
    rotation: HashMap<String, usize>,
}

impl Responder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer a parsed request
    pub fn respond(&mut self, request: &Request, ghost: Option<&GhostInfo>) -> Response {
        let Some(event) = request.id.as_deref() else {
            warn!("request without ID header");
            return Response::bad_request();
        };

        // Notifications never carry dialog back
        if request.method == Method::Notify {
            debug!(event, "notification acknowledged");
            return Response::no_content();
        }

        match event {
            "OnBoot" => self.scripted(event, dialog::GREETINGS),
            "OnFirstBoot" => Response::ok(script::plain(dialog::FIRST_BOOT)),
            "OnClose" => self.scripted(event, dialog::FAREWELLS),
            "OnMouseClick" => self.on_mouse_click(request),
            "OnRandom" | "OnAiTalk" => self.scripted(event, dialog::IDLE_TALK),
            "OnSecondChange" => Response::no_content(),
            "OnMinuteChange" => Self::on_minute_change(request),
            other => {
                debug!(event = other, ghost = ghost.map(|g| g.name.as_str()), "unknown event");
                Response::no_content()
            }
        }
    }

    /// Pick the next line for an event and wrap it in a script
    fn scripted(&mut self, event: &str, set: &[&str]) -> Response {
        let counter = self.rotation.entry(event.to_string()).or_insert(0);
        let line = set[*counter % set.len()];
        *counter += 1;
        Response::ok(script::plain(line))
    }

    fn on_mouse_click(&mut self, request: &Request) -> Response {
        // Reference2 is the hit part; the head gets its own surface
        let part = request.reference(2).unwrap_or("body");
        let surface = if part == "head" { 1 } else { 0 };

        let counter = self
            .rotation
            .entry("OnMouseClick".to_string())
            .or_insert(0);
        let line = dialog::CLICK_REACTIONS[*counter % dialog::CLICK_REACTIONS.len()];
        *counter += 1;

        let body = script::ScriptBuilder::new()
            .scope_main()
            .surface(surface)
            .text(line)
            .build();
        Response::ok(body)
    }

    fn on_minute_change(request: &Request) -> Response {
        let minute = request
            .reference(0)
            .and_then(|m| m.parse::<u32>().ok())
            .unwrap_or(1);

        if minute == 0 {
            Response::ok(script::plain(dialog::CHIME))
        } else {
            Response::no_content()
        }
    }
}
