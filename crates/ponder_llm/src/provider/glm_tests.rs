use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn glm() -> Glm {
    Glm::try_from(&GlmConfig {
        api_key: "test-key".to_owned(),
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn missing_api_key_is_a_config_error() {
    assert!(matches!(
        Glm::try_from(&GlmConfig::default()),
        Err(Error::MissingApiKey(ProviderId::Glm))
    ));
}

#[test]
fn system_message_leads_the_request() {
    let query = ChatQuery::default()
        .with_user("earlier question")
        .with_user("current question")
        .with_system("be brief");

    let request = glm().build_request(&query);

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "model": "glm-4",
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "earlier question"},
                {"role": "user", "content": "current question"},
            ],
        })
    );
}

#[test]
fn non_assistant_roles_map_to_user() {
    let mut query = ChatQuery::default().with_user("question");
    query.messages.push(crate::query::ChatMessage {
        role: ponder_conversation::Role::Assistant,
        content: "earlier reply".to_owned(),
    });

    let request = glm().build_request(&query);

    let roles = request
        .messages
        .iter()
        .map(|m| m.role)
        .collect::<Vec<_>>();
    assert_eq!(
        roles,
        vec![
            ponder_openai::types::request::Role::User,
            ponder_openai::types::request::Role::Assistant,
        ]
    );
}

#[test]
fn request_without_system_has_no_system_entry() {
    let request = glm().build_request(&ChatQuery::default().with_user("question"));

    assert_eq!(request.messages.len(), 1);
    assert_eq!(
        request.messages[0].role,
        ponder_openai::types::request::Role::User
    );
}
