//! Browser `fetch` transport for the question bank.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use hackathon::{FetchError, PlayerProfile, QuestionFeed, QuestionSource, SourceResponse};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// POSTs the player profile to `{base_url}{feed path}` and parks the
/// answers in a mailbox the session drains on its next tick.
pub struct HttpQuestionSource {
    base_url: String,
    mailbox: Rc<RefCell<VecDeque<SourceResponse>>>,
}

impl HttpQuestionSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            mailbox: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn url(&self, feed: QuestionFeed) -> String {
        format!("{}{}", self.base_url, feed.path())
    }
}

fn js_error(value: JsValue) -> FetchError {
    FetchError::Transport(
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    )
}

async fn post_json(url: String, body: String) -> Result<String, FetchError> {
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_mode(RequestMode::Cors);
    init.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(&url, &init).map_err(js_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(js_error)?;

    let window = web_sys::window().ok_or_else(|| FetchError::Transport("no window".into()))?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let response: Response = response.dyn_into().map_err(js_error)?;
    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    text.as_string()
        .ok_or_else(|| FetchError::Decode("response body is not text".into()))
}

impl QuestionSource for HttpQuestionSource {
    fn send(&mut self, feed: QuestionFeed, profile: &PlayerProfile, ticket: u64) {
        let body = match serde_json::to_string(profile) {
            Ok(body) => body,
            Err(err) => {
                self.mailbox.borrow_mut().push_back(SourceResponse {
                    feed,
                    ticket,
                    body: Err(err.into()),
                });
                return;
            }
        };
        let url = self.url(feed);
        let mailbox = Rc::clone(&self.mailbox);
        log::debug!("POST {url} (ticket {ticket})");
        wasm_bindgen_futures::spawn_local(async move {
            let body = post_json(url, body).await;
            mailbox
                .borrow_mut()
                .push_back(SourceResponse { feed, ticket, body });
        });
    }

    fn receive(&mut self) -> Vec<SourceResponse> {
        self.mailbox.borrow_mut().drain(..).collect()
    }
}
