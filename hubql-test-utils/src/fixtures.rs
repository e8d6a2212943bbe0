//! JSON fixtures shaped like the fragments the client selects
//!
//! Each builder returns the node GitHub would send for one record, filled
//! with plausible values derived from its arguments.

use serde_json::{Value, json};

const CREATED_AT: &str = "2011-01-26T19:01:12Z";
const UPDATED_AT: &str = "2024-03-01T10:15:00Z";

pub fn actor(login: &str) -> Value {
  json!({ "login": login, "url": format!("https://github.com/{login}") })
}

pub fn user(login: &str) -> Value {
  json!({
    "id": format!("U_{login}"),
    "login": login,
    "name": "Mona Lisa Octocat",
    "bio": null,
    "company": "GitHub",
    "location": "San Francisco",
    "url": format!("https://github.com/{login}"),
    "createdAt": CREATED_AT
  })
}

pub fn organization(login: &str) -> Value {
  json!({
    "id": format!("O_{login}"),
    "login": login,
    "name": login.to_uppercase(),
    "description": "An organization",
    "url": format!("https://github.com/{login}"),
    "websiteUrl": null
  })
}

pub fn repository(owner: &str, name: &str) -> Value {
  json!({
    "id": format!("R_{owner}_{name}"),
    "name": name,
    "nameWithOwner": format!("{owner}/{name}"),
    "owner": actor(owner),
    "description": "My first repository on GitHub!",
    "url": format!("https://github.com/{owner}/{name}"),
    "visibility": "PUBLIC",
    "isFork": false,
    "isArchived": false,
    "stargazerCount": 80,
    "forkCount": 9,
    "defaultBranchRef": { "name": "main" },
    "createdAt": CREATED_AT,
    "updatedAt": UPDATED_AT,
    "pushedAt": UPDATED_AT
  })
}

pub fn branch(name: &str) -> Value {
  json!({ "name": name, "target": { "oid": "6dcb09b5b57875f334f61aebed695e2e4193db5e" } })
}

pub fn label(name: &str) -> Value {
  json!({
    "id": format!("LA_{name}"),
    "name": name,
    "color": "f29513",
    "description": null,
    "isDefault": false
  })
}

pub fn milestone(number: u32) -> Value {
  json!({
    "id": format!("MI_{number}"),
    "number": number,
    "title": format!("v{number}.0"),
    "description": "Tracking milestone",
    "state": "OPEN",
    "url": format!("https://github.com/octocat/Hello-World/milestone/{number}"),
    "dueOn": null,
    "closedAt": null
  })
}

pub fn issue(number: u32) -> Value {
  json!({
    "id": format!("I_{number}"),
    "number": number,
    "title": format!("Issue {number}"),
    "body": "I'm having a problem with this.",
    "state": "OPEN",
    "url": format!("https://github.com/octocat/Hello-World/issues/{number}"),
    "author": actor("octocat"),
    "labels": { "nodes": [label("bug")] },
    "milestone": null,
    "createdAt": CREATED_AT,
    "updatedAt": UPDATED_AT,
    "closedAt": null
  })
}

pub fn comment(id: &str) -> Value {
  json!({
    "id": id,
    "body": "Me too",
    "url": format!("https://github.com/octocat/Hello-World/issues/1347#issuecomment-{id}"),
    "author": actor("octocat"),
    "createdAt": CREATED_AT,
    "updatedAt": UPDATED_AT
  })
}

pub fn pull_request(number: u32) -> Value {
  json!({
    "id": format!("PR_{number}"),
    "number": number,
    "title": format!("Pull request {number}"),
    "body": "Please pull these awesome changes in!",
    "state": "OPEN",
    "url": format!("https://github.com/octocat/Hello-World/pull/{number}"),
    "author": actor("octocat"),
    "isDraft": false,
    "baseRefName": "main",
    "headRefName": "new-topic",
    "mergeable": "MERGEABLE",
    "merged": false,
    "mergedAt": null,
    "labels": { "nodes": [] },
    "createdAt": CREATED_AT,
    "updatedAt": UPDATED_AT
  })
}

pub fn review(id: &str, state: &str) -> Value {
  json!({
    "id": id,
    "body": "Here is the body for the review.",
    "state": state,
    "url": format!("https://github.com/octocat/Hello-World/pull/12#pullrequestreview-{id}"),
    "author": actor("octocat"),
    "submittedAt": if state == "PENDING" { Value::Null } else { json!(UPDATED_AT) }
  })
}

pub fn project(number: u32) -> Value {
  json!({
    "id": format!("PVT_{number}"),
    "number": number,
    "title": format!("Roadmap {number}"),
    "shortDescription": null,
    "url": format!("https://github.com/users/octocat/projects/{number}"),
    "closed": false,
    "public": true,
    "createdAt": CREATED_AT,
    "updatedAt": UPDATED_AT
  })
}

/// Add a `__typename` tag to a node, as search results carry
pub fn typed(typename: &str, mut node: Value) -> Value {
  if let Some(map) = node.as_object_mut() {
    map.insert("__typename".to_string(), json!(typename));
  }
  node
}
