#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    Inline,
    InlineBlock,
    Flex,
    Grid,
    Table,
    TableRow,
    TableCell,
    ListItem,
    None,
}

impl Display {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "block" => Some(Self::Block),
            "inline" => Some(Self::Inline),
            "inline-block" => Some(Self::InlineBlock),
            "flex" | "inline-flex" => Some(Self::Flex),
            "grid" | "inline-grid" => Some(Self::Grid),
            "table" => Some(Self::Table),
            "table-row" => Some(Self::TableRow),
            "table-cell" => Some(Self::TableCell),
            "list-item" => Some(Self::ListItem),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Inline => "inline",
            Self::InlineBlock => "inline-block",
            Self::Flex => "flex",
            Self::Grid => "grid",
            Self::Table => "table",
            Self::TableRow => "table-row",
            Self::TableCell => "table-cell",
            Self::ListItem => "list-item",
            Self::None => "none",
        }
    }

    /// Whether the box starts on its own line.
    pub fn is_block_level(self) -> bool {
        matches!(
            self,
            Self::Block | Self::Flex | Self::Grid | Self::Table | Self::TableRow | Self::ListItem
        )
    }

    /// User-agent default for a tag that declares no display of its own.
    pub fn default_for_tag(tag: &str) -> Self {
        match tag {
            "head" | "script" | "style" | "template" | "noscript" | "title" | "meta" | "link" => {
                Self::None
            }
            "html" | "body" | "div" | "p" | "section" | "article" | "header" | "footer"
            | "nav" | "main" | "aside" | "form" | "fieldset" | "ul" | "ol" | "dl" | "dt" | "dd"
            | "blockquote" | "pre" | "hr" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
            | "thead" | "tbody" | "tfoot" => Self::Block,
            "table" => Self::Table,
            "tr" => Self::TableRow,
            "td" | "th" => Self::TableCell,
            "li" => Self::ListItem,
            _ => Self::Inline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

impl Visibility {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "visible" => Some(Self::Visible),
            "hidden" => Some(Self::Hidden),
            "collapse" => Some(Self::Collapse),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Collapse => "collapse",
        }
    }
}

/// Declared style of a single element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InlineStyle {
    pub display: Option<Display>,
    pub visibility: Option<Visibility>,
}

impl InlineStyle {
    pub fn is_empty(&self) -> bool {
        self.display.is_none() && self.visibility.is_none()
    }

    /// Renders the declarations as a `style` attribute value.
    pub fn to_css(&self) -> String {
        let mut parts = Vec::new();
        if let Some(display) = self.display {
            parts.push(format!("display: {}", display.as_str()));
        }
        if let Some(visibility) = self.visibility {
            parts.push(format!("visibility: {}", visibility.as_str()));
        }
        parts.join("; ")
    }
}

/// Effective style after tag defaults and inheritance are applied.
///
/// `display` never inherits; `visibility` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedStyle {
    pub display: Display,
    pub visibility: Visibility,
}

impl ComputedStyle {
    pub fn is_rendered(&self) -> bool {
        self.display != Display::None && self.visibility != Visibility::Hidden
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Instant,
    Smooth,
}

impl ScrollBehavior {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "instant" => Some(Self::Instant),
            "smooth" => Some(Self::Smooth),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Instant => "instant",
            Self::Smooth => "smooth",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

impl ScrollBlock {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "center" => Some(Self::Center),
            "end" => Some(Self::End),
            "nearest" => Some(Self::Nearest),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
            Self::Nearest => "nearest",
        }
    }
}
