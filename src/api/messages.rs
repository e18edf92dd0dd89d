use super::models::MessageQuery;

pub fn message_endpoint(user_id: &str, id: &str) -> String {
    format!("/gmail/v1/users/{user_id}/messages/{id}")
}

pub fn list_endpoint(user_id: &str) -> String {
    format!("/gmail/v1/users/{user_id}/messages")
}

pub fn send_endpoint(user_id: &str) -> String {
    format!("/gmail/v1/users/{user_id}/messages/send")
}

pub fn get_query() -> Vec<(String, String)> {
    vec![("format".to_string(), "full".to_string())]
}

pub fn list_query(filter: &MessageQuery) -> Vec<(String, String)> {
    let mut params = Vec::with_capacity(3);

    if let Some(query) = &filter.query {
        params.push(("q".to_string(), query.clone()));
    }
    if let Some(label_id) = &filter.label_id {
        params.push(("labelIds".to_string(), label_id.clone()));
    }
    params.push(("maxResults".to_string(), filter.count.to_string()));

    params
}
