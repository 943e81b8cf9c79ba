use serde::{Deserialize, Serialize};

/// A visual résumé template the user can pick. Display-only data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub preview: &'static str,
    pub description: &'static str,
}

pub const TEMPLATES: &[Template] = &[
    Template {
        id: "minimal",
        name: "Minimal",
        preview: "https://placehold.co/300x400/f5f5f5/333333?text=Minimal+Template",
        description: "Clean and minimalist design focusing on content.",
    },
    Template {
        id: "professional",
        name: "Professional",
        preview: "https://placehold.co/300x400/f0f8ff/333333?text=Professional+Template",
        description: "Traditional professional layout with a modern touch.",
    },
    Template {
        id: "creative",
        name: "Creative",
        preview: "https://placehold.co/300x400/fff8f0/333333?text=Creative+Template",
        description: "Stand out with a unique creative design.",
    },
    Template {
        id: "technical",
        name: "Technical",
        preview: "https://placehold.co/300x400/f0fff0/333333?text=Technical+Template",
        description: "Optimized for technical roles and skills.",
    },
    Template {
        id: "executive",
        name: "Executive",
        preview: "https://placehold.co/300x400/fff0f0/333333?text=Executive+Template",
        description: "Elegant design for senior and executive positions.",
    },
    Template {
        id: "modern",
        name: "Modern",
        preview: "https://placehold.co/300x400/f0f0ff/333333?text=Modern+Template",
        description: "Contemporary layout with a fresh approach.",
    },
];

pub fn find_template(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Resolves the selected template, falling back to the first catalog entry
/// when nothing (or an unknown id) is selected.
pub fn resolve_template<'a>(catalog: &'a [Template], selected_id: Option<&str>) -> Option<&'a Template> {
    selected_id
        .and_then(|id| catalog.iter().find(|t| t.id == id))
        .or_else(|| catalog.first())
}
