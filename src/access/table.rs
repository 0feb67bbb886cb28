//! Permission table declared at process start.

use super::{AccessControl, AccessError};

pub const SUBSCRIBER: &str = "assinante";
pub const POST: &str = "post";
pub const POST_READABLE_FIELDS: [&str; 4] = ["id", "titulo", "conteudo", "autor"];

/// Subscribers may read a post's id, title, body and author, nothing else.
pub fn post_permissions() -> Result<AccessControl, AccessError> {
    let mut control = AccessControl::new();
    control
        .grant(SUBSCRIBER)?
        .read(POST, POST_READABLE_FIELDS.iter().copied());
    Ok(control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::types::{Action, Possession};
    use serde_json::json;

    #[test]
    fn subscriber_reads_declared_post_fields_only() {
        let control = post_permissions().unwrap();
        let permission = control.can(SUBSCRIBER).unwrap().read_any(POST);

        let cases = vec![
            ("id", true),
            ("titulo", true),
            ("conteudo", true),
            ("autor", true),
            ("senha", false),
            ("email", false),
        ];

        cases.into_iter().for_each(|(field, expected)| {
            assert_eq!(permission.allows(field), expected, "{}", field);
        });
    }

    #[test]
    fn subscriber_cannot_write_posts() {
        let control = post_permissions().unwrap();
        let query = control.can(SUBSCRIBER).unwrap();

        for action in [Action::Create, Action::Update, Action::Delete].iter() {
            assert!(!query.permission(*action, Possession::Any, POST).granted(), "{:?}", action);
        }
    }

    #[test]
    fn declares_a_single_role() {
        let control = post_permissions().unwrap();

        assert_eq!(control.roles().collect::<Vec<_>>(), vec![SUBSCRIBER]);
        assert!(control.can("admin").is_err());
    }

    #[test]
    fn strips_undeclared_fields_from_post() {
        let control = post_permissions().unwrap();
        let permission = control.can(SUBSCRIBER).unwrap().read_any(POST);

        let post = json!({
            "id": 1,
            "titulo": "Olá",
            "conteudo": "...",
            "autor": "ana",
            "senha": "segredo",
        });

        assert_eq!(
            permission.filter(&post),
            json!({ "id": 1, "titulo": "Olá", "conteudo": "...", "autor": "ana" })
        );
    }
}
