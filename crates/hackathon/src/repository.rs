//! Question data access for the session.
//!
//! The session never sees the transport. It asks a [`QuestionRepository`] for
//! cached questions, issues tagged requests, and drains tagged completions
//! once per tick. [`QuestionBank`] is the production repository; it caches
//! per feed on top of any [`QuestionSource`] transport.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::FetchError;
use crate::questions::{default_batch, Payload, PlayerProfile, Question, QuestionFeed};

/// A finished request, tagged with the fetch token it currently answers.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub feed: QuestionFeed,
    pub token: u64,
    pub outcome: Result<(), FetchError>,
}

pub trait QuestionRepository {
    /// Question ready to mount for `feed`, if cached.
    fn question(&self, feed: QuestionFeed) -> Option<Question>;

    /// A request for `feed` is in flight.
    fn is_loading(&self, feed: QuestionFeed) -> bool;

    /// Last recorded failure for `feed`.
    fn error(&self, feed: QuestionFeed) -> Option<String>;

    /// Fetch `feed` on behalf of `token`. If a request is already in flight,
    /// no new one is sent; its completion is re-tagged with `token`.
    fn request(&mut self, feed: QuestionFeed, profile: &PlayerProfile, token: u64);

    /// Completions that arrived since the last poll.
    fn poll(&mut self) -> Vec<Completion>;

    /// The question for `feed` was answered; single questions are dropped so
    /// the next talk fetches a fresh one, batches move to their next entry.
    fn consume(&mut self, feed: QuestionFeed);

    /// Forget a recorded failure so the next explicit trigger retries.
    fn clear_error(&mut self, feed: QuestionFeed);

    /// Start of a new round: forget every failure. Cached questions stay.
    fn reset(&mut self) {
        for feed in QuestionFeed::ALL {
            self.clear_error(feed);
        }
    }
}

/// Raw transport answer, matched back to its request by `ticket`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceResponse {
    pub feed: QuestionFeed,
    pub ticket: u64,
    pub body: Result<String, FetchError>,
}

/// HTTP (or test) transport underneath [`QuestionBank`].
pub trait QuestionSource {
    /// Start a POST of `profile` to the feed's endpoint. Never blocks.
    fn send(&mut self, feed: QuestionFeed, profile: &PlayerProfile, ticket: u64);

    /// Responses that arrived since the last call.
    fn receive(&mut self) -> Vec<SourceResponse>;
}

#[derive(Debug, Default)]
struct FeedState {
    cached: Option<Payload>,
    cursor: usize,
    /// `(transport ticket, session token)` of the request in flight.
    in_flight: Option<(u64, u64)>,
    error: Option<String>,
}

/// Per-feed cache over a [`QuestionSource`].
pub struct QuestionBank<S: QuestionSource> {
    source: S,
    feeds: HashMap<QuestionFeed, FeedState>,
    next_ticket: u64,
}

impl<S: QuestionSource> QuestionBank<S> {
    /// A bank whose batch feed starts out with the built-in questions.
    pub fn new(source: S) -> Self {
        let mut feeds: HashMap<QuestionFeed, FeedState> =
            QuestionFeed::ALL.iter().map(|f| (*f, FeedState::default())).collect();
        if let Some(batch) = feeds.get_mut(&QuestionFeed::ChoiceBatch) {
            batch.cached = Some(Payload::Batch(default_batch()));
        }
        Self {
            source,
            feeds,
            next_ticket: 1,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn feed(&mut self, feed: QuestionFeed) -> &mut FeedState {
        self.feeds.entry(feed).or_default()
    }

    fn settle(&mut self, response: SourceResponse) -> Option<Completion> {
        let state = self.feed(response.feed);
        let token = match state.in_flight {
            Some((ticket, token)) if ticket == response.ticket => token,
            _ => {
                debug!("{:?}: dropping response for ticket {}", response.feed, response.ticket);
                return None;
            }
        };
        state.in_flight = None;

        let outcome = response
            .body
            .and_then(|body| Payload::decode(response.feed, &body));
        let outcome = match outcome {
            Ok(payload) => {
                state.cached = Some(payload);
                state.cursor = 0;
                state.error = None;
                Ok(())
            }
            Err(err) => {
                warn!("{:?}: question fetch failed: {}", response.feed, err);
                if response.feed == QuestionFeed::ChoiceBatch {
                    state.cached = Some(Payload::Batch(default_batch()));
                    state.cursor = 0;
                }
                state.error = Some(err.to_string());
                Err(err)
            }
        };
        Some(Completion {
            feed: response.feed,
            token,
            outcome,
        })
    }
}

impl<S: QuestionSource> QuestionRepository for QuestionBank<S> {
    fn question(&self, feed: QuestionFeed) -> Option<Question> {
        let state = self.feeds.get(&feed)?;
        state.cached.as_ref()?.question_at(state.cursor)
    }

    fn is_loading(&self, feed: QuestionFeed) -> bool {
        self.feeds.get(&feed).is_some_and(|s| s.in_flight.is_some())
    }

    fn error(&self, feed: QuestionFeed) -> Option<String> {
        self.feeds.get(&feed).and_then(|s| s.error.clone())
    }

    fn request(&mut self, feed: QuestionFeed, profile: &PlayerProfile, token: u64) {
        if let Some((ticket, _)) = self.feed(feed).in_flight {
            debug!("{:?}: request {} re-tagged to token {}", feed, ticket, token);
            self.feed(feed).in_flight = Some((ticket, token));
            return;
        }
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let state = self.feed(feed);
        state.in_flight = Some((ticket, token));
        state.error = None;
        debug!("{:?}: sending ticket {} for token {}", feed, ticket, token);
        self.source.send(feed, profile, ticket);
    }

    fn poll(&mut self) -> Vec<Completion> {
        let responses = self.source.receive();
        responses
            .into_iter()
            .filter_map(|r| self.settle(r))
            .collect()
    }

    fn consume(&mut self, feed: QuestionFeed) {
        let state = self.feed(feed);
        match state.cached {
            Some(Payload::Batch(_)) => state.cursor += 1,
            Some(_) => state.cached = None,
            None => {}
        }
    }

    fn clear_error(&mut self, feed: QuestionFeed) {
        self.feed(feed).error = None;
    }
}
