use validator::ValidateEmail;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<SubscriberEmail, String> {
        if s.validate_email() && has_dotted_domain(&s) {
            Ok(Self(s))
        } else {
            Err(format!("{} is not a valid subscriber email.", s))
        }
    }
}

// The address grammar accepts single-label domains such as `localhost`,
// subscribers must use a fully qualified one.
fn has_dotted_domain(s: &str) -> bool {
    match s.rsplit_once('@') {
        Some((_, domain)) => domain
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
            > 1,
        None => false,
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
