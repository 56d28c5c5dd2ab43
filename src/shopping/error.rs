#[derive(Debug)]
pub enum GenerateError {
    EmptyRecipeIds,
    InvalidRecipeId(String),
    InvalidListId(String),
    InvalidWeekStart(String),
    NoIngredients,
    Storage(anyhow::Error),
}

impl GenerateError {
    /// Caller errors are reported before anything is persisted.
    pub fn is_caller_error(&self) -> bool {
        match self {
            GenerateError::EmptyRecipeIds
            | GenerateError::InvalidRecipeId(_)
            | GenerateError::InvalidListId(_)
            | GenerateError::InvalidWeekStart(_)
            | GenerateError::NoIngredients => true,
            GenerateError::Storage(_) => false,
        }
    }
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::EmptyRecipeIds => write!(f, "recipe_ids must be a non-empty array"),
            GenerateError::InvalidRecipeId(id) => write!(f, "invalid recipe id: {id}"),
            GenerateError::InvalidListId(id) => write!(f, "invalid list id: {id}"),
            GenerateError::InvalidWeekStart(s) => write!(f, "invalid week_start (expected YYYY-MM-DD): {s}"),
            GenerateError::NoIngredients => write!(f, "no ingredients found for the selected recipes"),
            GenerateError::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::Storage(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for GenerateError {
    fn from(err: anyhow::Error) -> Self {
        GenerateError::Storage(err)
    }
}
