use wasm_bindgen::JsValue;
use web_sys as web;

const NOTICE_ID: &str = "tracker-notice";
const NOTICE_STYLE: &str = "position:fixed;inset:0;display:flex;align-items:center;\
justify-content:center;background:rgba(0,0,0,0.8);color:#fff;font:16px sans-serif;\
padding:2em;text-align:center;z-index:1000";

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Show a full-screen notice over the canvas, creating it on first use.
pub fn show_notice(message: &str) -> Result<(), JsValue> {
    let document = window_document().ok_or_else(|| JsValue::from_str("no document"))?;
    let el = match document.get_element_by_id(NOTICE_ID) {
        Some(el) => el,
        None => {
            let el = document.create_element("div")?;
            el.set_id(NOTICE_ID);
            let body = document
                .body()
                .ok_or_else(|| JsValue::from_str("no body"))?;
            body.append_child(&el)?;
            el
        }
    };
    el.set_text_content(Some(message));
    el.set_attribute("style", NOTICE_STYLE)?;
    el.set_attribute("role", "alert")?;
    Ok(())
}

#[inline]
pub fn hide_notice() {
    if let Some(el) = window_document().and_then(|d| d.get_element_by_id(NOTICE_ID)) {
        let _ = el.set_attribute("style", "display:none");
    }
}
