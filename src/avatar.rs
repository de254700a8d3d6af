//! Avatar initials and color classes
//!
//! Colors are `avatar-color-1` .. `avatar-color-6`, derived from a stable
//! numeric user id when there is one, otherwise from the username.

use crate::constant::AVATAR_COLOR_COUNT;
use maud::{Markup, html};

const COLOR_CLASS_PREFIX: &str = "avatar-color-";

/// Sum of UTF-16 code units mod 6, plus one; empty seeds get color 1
pub fn color_index(seed: &str) -> u32 {
    if seed.is_empty() {
        return 1;
    }
    let hash: u64 = seed.encode_utf16().map(u64::from).sum();
    (hash % u64::from(AVATAR_COLOR_COUNT)) as u32 + 1
}

pub fn color_index_for_id(id: i64) -> u32 {
    id.rem_euclid(i64::from(AVATAR_COLOR_COUNT)) as u32 + 1
}

/// Numeric id wins over the username so renames keep the color
pub fn preferred_color_index(username: &str, user_id: Option<i64>) -> u32 {
    match user_id {
        Some(id) => color_index_for_id(id),
        None => color_index(username),
    }
}

pub fn color_class(index: u32) -> String {
    format!("{COLOR_CLASS_PREFIX}{index}")
}

/// First two characters, upper-cased
pub fn initials(username: &str) -> String {
    username.chars().take(2).flat_map(char::to_uppercase).collect()
}

/// An avatar placeholder: its text and class list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvatarElement {
    pub text: String,
    pub classes: Vec<String>,
}

impl AvatarElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            classes: vec!["avatar-placeholder".to_string()],
        }
    }

    pub fn color_class(&self) -> Option<&str> {
        self.classes
            .iter()
            .map(String::as_str)
            .find(|c| c.starts_with(COLOR_CLASS_PREFIX))
    }

    /// Replace whatever color class is present with the given one
    pub fn apply_color(&mut self, index: u32) {
        self.classes.retain(|c| !c.starts_with(COLOR_CLASS_PREFIX));
        self.classes.push(color_class(index));
    }

    /// Detail-view styling: always resets initials and color
    pub fn style_for_user(&mut self, username: &str, user_id: Option<i64>) {
        self.text = initials(username);
        self.apply_color(preferred_color_index(username, user_id));
    }

    /// Page-load styling: fill in missing text, never replace an existing color.
    /// `data_user` is the element's own user attribute, `context_username`
    /// the nearest enclosing row's username.
    pub fn initialize(&mut self, data_user: Option<&str>, context_username: Option<&str>) {
        if self.text.trim().is_empty()
            && let Some(user) = data_user
        {
            self.text = initials(user);
        }

        if self.color_class().is_none() {
            let seed = context_username.unwrap_or_else(|| self.text.trim());
            let index = color_index(seed);
            self.apply_color(index);
        }
    }

    pub fn to_html(&self) -> Markup {
        html! {
            div class=(self.classes.join(" ")) { (self.text) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_color_is_deterministic() {
        let first = color_index("alice");
        assert_eq!(first, color_index("alice"));
        // a+l+i+c+e = 97+108+105+99+101 = 510, 510 % 6 = 0
        assert_eq!(first, 1);
        assert!((1..=6).contains(&color_index("bob")));
    }

    #[test]
    fn id_color_uses_modulo() {
        assert_eq!(color_index_for_id(7), 2);
        assert_eq!(color_index_for_id(6), 1);
        assert_eq!(color_index_for_id(5), 6);
    }

    #[test]
    fn id_is_preferred_over_username() {
        assert_eq!(preferred_color_index("alice", Some(7)), 2);
        assert_eq!(preferred_color_index("alice", None), color_index("alice"));
    }

    #[test]
    fn empty_seed_is_color_one() {
        assert_eq!(color_index(""), 1);
    }

    #[test]
    fn styling_twice_leaves_one_color_class() {
        let mut avatar = AvatarElement::new("");
        avatar.classes.push("avatar-color-4".to_string());
        avatar.style_for_user("alice", Some(7));
        avatar.style_for_user("alice", Some(7));

        let colors: Vec<&String> = avatar
            .classes
            .iter()
            .filter(|c| c.starts_with("avatar-color-"))
            .collect();
        assert_eq!(colors, vec!["avatar-color-2"]);
        assert_eq!(avatar.text, "AL");
        assert!(avatar.classes.contains(&"avatar-placeholder".to_string()));
    }

    #[test]
    fn initialize_keeps_existing_text_and_color() {
        let mut avatar = AvatarElement::new("ZZ");
        avatar.classes.push("avatar-color-5".to_string());
        avatar.initialize(Some("alice"), Some("alice"));
        assert_eq!(avatar.text, "ZZ");
        assert_eq!(avatar.color_class(), Some("avatar-color-5"));

        let mut blank = AvatarElement::new("  ");
        blank.initialize(Some("bob"), None);
        assert_eq!(blank.text, "BO");
        assert_eq!(blank.color_class(), Some(color_class(color_index("BO")).as_str()));
    }

    #[test]
    fn initials_handle_short_and_unicode_names() {
        assert_eq!(initials("a"), "A");
        assert_eq!(initials("élodie"), "ÉL");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn html_escapes_text() {
        let avatar = AvatarElement::new("<b");
        assert_eq!(
            avatar.to_html().into_string(),
            r#"<div class="avatar-placeholder">&lt;b</div>"#
        );
    }
}
