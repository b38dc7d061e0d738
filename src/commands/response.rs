//! Command responses and reply visibility

/// Who can see a command's reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Ephemeral,
    /// The response's own `ephemeral` flag decides
    Dynamic,
}

impl Visibility {
    pub fn resolve(self, response: &CommandResponse) -> bool {
        match self {
            Visibility::Public => false,
            Visibility::Ephemeral => true,
            Visibility::Dynamic => response.ephemeral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEmbed {
    pub title: Option<String>,
    pub description: String,
    pub color: Option<u32>,
}

impl ResponseEmbed {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: description.into(),
            color: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Text(String),
    Embed(ResponseEmbed),
}

/// What a handler hands back for a slash invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub body: ResponseBody,
    pub ephemeral: bool,
}

impl CommandResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            body: ResponseBody::Text(content.into()),
            ephemeral: false,
        }
    }

    pub fn embed(embed: ResponseEmbed) -> Self {
        Self {
            body: ResponseBody::Embed(embed),
            ephemeral: false,
        }
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    /// Best-effort reply sent when a handler fails
    pub fn failure(message: impl Into<String>) -> Self {
        Self::text(message).ephemeral(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_resolution() {
        let public = CommandResponse::text("hi");
        let private = CommandResponse::text("hi").ephemeral(true);

        assert!(!Visibility::Public.resolve(&private));
        assert!(Visibility::Ephemeral.resolve(&public));
        assert!(!Visibility::Dynamic.resolve(&public));
        assert!(Visibility::Dynamic.resolve(&private));
    }

    #[test]
    fn test_failure_is_ephemeral_text() {
        let response = CommandResponse::failure("boom");
        assert!(response.ephemeral);
        assert_eq!(response.body, ResponseBody::Text("boom".to_string()));
    }

    #[test]
    fn test_embed_builder() {
        let embed = ResponseEmbed::new("desc").title("About").color(0x6F4E37);
        assert_eq!(embed.title.as_deref(), Some("About"));
        assert_eq!(embed.color, Some(0x6F4E37));
    }
}
