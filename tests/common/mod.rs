// tests/common/mod.rs
//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use url::Url;
use xhsfetch::api::envelope::into_outcome;
use xhsfetch::api::{assemble, SignedRequest};
use xhsfetch::{ApiRequest, Failure, Outcome, SessionCredentials, StaticSigner, Transport};

/// An envelope page with `items` and a `has_more` flag.
pub fn items_page(items: impl IntoIterator<Item = i64>, has_more: bool) -> Value {
    json!({
        "success": true,
        "msg": "ok",
        "data": {"items": items.into_iter().collect::<Vec<_>>(), "has_more": has_more}
    })
}

/// Signs every request with a `StaticSigner`, records what would have been
/// sent, and answers from a queue of envelopes.
pub struct LoopbackTransport {
    pub signer: StaticSigner,
    credentials: SessionCredentials,
    base: Url,
    envelopes: RefCell<VecDeque<Result<Value, Failure>>>,
    sent: RefCell<Vec<SignedRequest>>,
}

impl LoopbackTransport {
    pub fn new(cookie: &str) -> Self {
        Self {
            signer: StaticSigner::default(),
            credentials: SessionCredentials::parse(cookie).unwrap(),
            base: Url::parse("https://edith.xiaohongshu.com").unwrap(),
            envelopes: RefCell::new(VecDeque::new()),
            sent: RefCell::new(Vec::new()),
        }
    }

    pub fn respond(self, envelope: Value) -> Self {
        self.envelopes.borrow_mut().push_back(Ok(envelope));
        self
    }

    pub fn fail(self, failure: Failure) -> Self {
        self.envelopes.borrow_mut().push_back(Err(failure));
        self
    }

    pub fn sent(&self) -> Vec<SignedRequest> {
        self.sent.borrow().clone()
    }

    pub fn calls(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl Transport for LoopbackTransport {
    fn call(&self, request: &ApiRequest) -> Outcome<Value> {
        let signed = assemble(&self.signer, &self.credentials, &self.base, request)?;
        self.sent.borrow_mut().push(signed);
        match self.envelopes.borrow_mut().pop_front() {
            Some(Ok(envelope)) => into_outcome(envelope),
            Some(Err(failure)) => Err(failure),
            None => Err(Failure::transport("no scripted response left")),
        }
    }
}
