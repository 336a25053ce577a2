use gradebookd::{validate_topic_weights, Topic};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::ipc::error::{calc_err, ok};
use crate::ipc::helpers::{parse_params, require};
use crate::ipc::types::{AppState, Request};

#[derive(Debug, Deserialize)]
struct TopicParams {
    #[serde(default)]
    topic: Option<Topic>,
}

fn handle_topics_validate(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: TopicParams = match parse_params(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let topic = match require(req, params.topic, "topic") {
        Ok(v) => v,
        Err(e) => return e,
    };

    match validate_topic_weights(&topic) {
        Ok(total) => ok(&req.id, json!({ "topicId": topic.id, "total": total })),
        Err(e) => {
            debug!(topic_id = %topic.id, error = %e, "topic weights rejected");
            calc_err(&req.id, e)
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "topics.validate" => Some(handle_topics_validate(state, req)),
        _ => None,
    }
}
