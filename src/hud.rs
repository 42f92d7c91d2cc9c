use crate::game::view::StatusView;
use log::debug;
use web_sys::Document;

const DAMAGE_ID: &str = "destruction-rate";
const STATUS_ID: &str = "planet-status";
const NAME_ID: &str = "current-planet-name";

pub fn render(body_name: &str, status: &StatusView) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        debug!("no document, hud not rendered");
        return;
    };
    set_text(&document, DAMAGE_ID, &status.damage_text);
    set_text(&document, STATUS_ID, &status.status_text);
    set_text(&document, NAME_ID, body_name);
}

fn set_text(document: &Document, id: &str, text: &str) {
    match document.get_element_by_id(id) {
        Some(element) => element.set_text_content(Some(text)),
        None => debug!("#{id} missing, skipped"),
    }
}
