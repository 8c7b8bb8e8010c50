use crate::classifier::normalize;
use crate::dom::{NodeId, Page};
use crate::model::{Profile, ProfileField};
use scraper::Selector;

/// Builds the field label from, in order: `<label for=id>` text, the nearest
/// ancestor `<label>`, `aria-label`, `placeholder` and `name`.
pub fn derive_label(page: &Page, input: NodeId) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(id) = page.attr(input, "id").filter(|id| !id.is_empty()) {
        if let Ok(selector) = Selector::parse("label[for]") {
            for label in page.select(&selector) {
                if page.attr(label, "for") == Some(id) {
                    parts.push(page.text_content(label));
                }
            }
        }
    }

    if let Some(label) = page
        .ancestors(input)
        .into_iter()
        .find(|&a| page.tag_name(a) == Some("label"))
    {
        parts.push(page.text_content(label));
    }

    for attr in ["aria-label", "placeholder", "name"] {
        if let Some(value) = page.attr(input, attr) {
            parts.push(value.to_string());
        }
    }

    normalize(&parts.join(" "))
}

struct Rule {
    any: &'static [&'static str],
    unless: &'static [&'static str],
    field: ProfileField,
}

impl Rule {
    fn matches(&self, label: &str) -> bool {
        self.any.iter().any(|k| label.contains(*k)) && !self.unless.iter().any(|k| label.contains(*k))
    }
}

const fn rule(any: &'static [&'static str], field: ProfileField) -> Rule {
    Rule { any, unless: &[], field }
}

// Order matters: "full name" and "first name" both contain "name".
const RULES: &[Rule] = &[
    Rule { any: &["first name"], unless: &["last name"], field: ProfileField::FirstName },
    rule(&["last name"], ProfileField::LastName),
    rule(&["full name"], ProfileField::FullName),
    rule(&["name"], ProfileField::FullName),
    rule(&["email"], ProfileField::Email),
    rule(&["phone", "mobile"], ProfileField::Phone),
    rule(&["city", "location", "address"], ProfileField::Location),
    rule(&["linkedin"], ProfileField::Linkedin),
    rule(&["website", "portfolio"], ProfileField::Website),
    rule(&["github"], ProfileField::Github),
    rule(&["years"], ProfileField::YearsExperience),
];

/// First rule whose keyword matches and whose profile value is non-empty.
fn resolve_field<'a>(label: &str, profile: &'a Profile) -> Option<(ProfileField, &'a str)> {
    RULES.iter().find_map(|r| {
        let value = profile.get(r.field);
        (r.matches(label) && !value.is_empty()).then_some((r.field, value))
    })
}

/// Profile value for the label, or an empty string when nothing applies.
pub fn map_label_to_profile_field(label: &str, profile: &Profile) -> String {
    resolve_field(label, profile)
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_profile() -> Profile {
        Profile {
            full_name: "Jane Doe".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@x.com".into(),
            phone: "+1 555 0100".into(),
            location: "Berlin".into(),
            linkedin: "https://linkedin.com/in/jane".into(),
            github: "https://github.com/jane".into(),
            website: "https://jane.dev".into(),
            years_experience: "7".into(),
        }
    }

    fn field(label: &str, profile: &Profile) -> Option<ProfileField> {
        resolve_field(label, profile).map(|(f, _)| f)
    }

    #[test]
    fn test_name_precedence() {
        let p = full_profile();
        assert_eq!(field("first name", &p), Some(ProfileField::FirstName));
        assert_eq!(field("last name", &p), Some(ProfileField::LastName));
        assert_eq!(field("full name", &p), Some(ProfileField::FullName));
        assert_eq!(field("name", &p), Some(ProfileField::FullName));
    }

    #[test]
    fn test_first_name_rule_beats_generic_name() {
        let p = full_profile();
        assert_eq!(field("first name (as on passport)", &p), Some(ProfileField::FirstName));
        // Contains "last name" but not "first name": the last-name rule fires
        // before the generic fallback.
        assert_eq!(field("first and last name", &p), Some(ProfileField::LastName));
    }

    #[test]
    fn test_other_rules() {
        let p = full_profile();
        assert_eq!(map_label_to_profile_field("email address", &p), "jane@x.com");
        assert_eq!(map_label_to_profile_field("mobile phone number", &p), "+1 555 0100");
        assert_eq!(map_label_to_profile_field("city", &p), "Berlin");
        assert_eq!(map_label_to_profile_field("linkedin profile", &p), "https://linkedin.com/in/jane");
        assert_eq!(map_label_to_profile_field("portfolio", &p), "https://jane.dev");
        assert_eq!(map_label_to_profile_field("github", &p), "https://github.com/jane");
        assert_eq!(map_label_to_profile_field("years of experience with rust", &p), "7");
        assert_eq!(map_label_to_profile_field("cover letter", &p), "");
    }

    #[test]
    fn test_empty_value_falls_through() {
        let p = Profile {
            full_name: "Jane Doe".into(),
            ..Default::default()
        };
        assert_eq!(map_label_to_profile_field("first name", &p), "Jane Doe");
        assert_eq!(map_label_to_profile_field("email", &p), "");
    }

    #[test]
    fn test_derive_label_sources_in_order() {
        let page = Page::parse(
            r#"<label for="fn">First
                 Name</label>
               <label>Wrapper <input id="fn" aria-label="Given" placeholder="e.g. Jane" name="firstName"></label>"#,
        );
        let input = page.select(&Selector::parse("#fn").unwrap())[0];
        assert_eq!(
            derive_label(&page, input),
            "first name wrapper given e.g. jane firstname"
        );
    }

    #[test]
    fn test_derive_label_without_sources() {
        let page = Page::parse(r#"<input type="text">"#);
        let input = page.select(&Selector::parse("input").unwrap())[0];
        assert_eq!(derive_label(&page, input), "");
    }
}
