// Route table of the dashboard pages.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("No page named '{0}'")]
    UnknownPage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Rag,
    FineTuning,
    Models,
    Prompts,
    Deploy,
    Playground,
    NotFound,
}

impl Route {
    /// Pages in sidebar order.
    pub const PAGES: [Route; 6] = [
        Route::FineTuning,
        Route::Models,
        Route::Rag,
        Route::Prompts,
        Route::Deploy,
        Route::Playground,
    ];

    pub const HOME: Route = Route::Rag;

    pub fn path(&self) -> &'static str {
        match self {
            Route::Rag => "/rag",
            Route::FineTuning => "/fine-tuning",
            Route::Models => "/models",
            Route::Prompts => "/prompts",
            Route::Deploy => "/deploy",
            Route::Playground => "/playground",
            Route::NotFound => "/404",
        }
    }

    /// Sidebar label.
    pub fn label(&self) -> &'static str {
        match self {
            Route::Rag => "AutoRAG",
            Route::FineTuning => "Fine Tuning",
            Route::Models => "Models",
            Route::Prompts => "Prompts",
            Route::Deploy => "Deploy",
            Route::Playground => "Playground",
            Route::NotFound => "Not Found",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Route::Rag => "AutoRAG",
            Route::FineTuning => "Fine-Tuning Workspace",
            Route::Models => "Models",
            Route::Prompts => "Prompt Library",
            Route::Deploy => "Deployment Hub",
            Route::Playground => "Model Playground",
            Route::NotFound => "404",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Route::Rag => "Deploy RAG pipelines with your models",
            Route::FineTuning => "Create and manage your fine-tuning projects",
            Route::Models => "Manage and train your AI models",
            Route::Prompts => "Create and manage prompt templates for your AI models",
            Route::Deploy => "Deploy your models to production environments",
            Route::Playground => "Test and interact with your AI models",
            Route::NotFound => "Oops! Page not found",
        }
    }

    /// Map a location to a page. `/` redirects home; anything unknown is `NotFound`.
    pub fn resolve(path: &str) -> Route {
        let path = path.trim();
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Self::HOME,
            "/rag" => Route::Rag,
            "/fine-tuning" => Route::FineTuning,
            "/models" => Route::Models,
            "/prompts" => Route::Prompts,
            "/deploy" => Route::Deploy,
            "/playground" => Route::Playground,
            _ => Route::NotFound,
        }
    }

    /// Strict lookup by page name (`rag`, `fine-tuning`, ...) or path.
    pub fn parse(name: &str) -> Result<Route, RouteError> {
        let n = name.trim().to_ascii_lowercase();
        if n.is_empty() {
            return Err(RouteError::UnknownPage(String::new()));
        }
        let as_path = if n.starts_with('/') {
            n.clone()
        } else {
            format!("/{}", n)
        };
        match Route::resolve(&as_path) {
            Route::NotFound => Err(RouteError::UnknownPage(name.trim().to_string())),
            route => Ok(route),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_redirects_to_rag() {
        assert_eq!(Route::resolve("/"), Route::Rag);
        assert_eq!(Route::resolve(""), Route::Rag);
    }

    #[test]
    fn known_paths_resolve() {
        for route in Route::PAGES {
            assert_eq!(Route::resolve(route.path()), route);
        }
    }

    #[test]
    fn trailing_slash_and_query_are_ignored() {
        assert_eq!(Route::resolve("/models/"), Route::Models);
        assert_eq!(Route::resolve("/deploy?tab=analytics"), Route::Deploy);
        assert_eq!(Route::resolve("/playground#top"), Route::Playground);
    }

    #[test]
    fn unknown_paths_fall_through() {
        assert_eq!(Route::resolve("/projects"), Route::NotFound);
        assert_eq!(Route::resolve("/rag/extra"), Route::NotFound);
        assert_eq!(Route::resolve("/RAG"), Route::NotFound);
    }

    #[test]
    fn parse_accepts_names_and_paths() {
        assert_eq!(Route::parse("fine-tuning"), Ok(Route::FineTuning));
        assert_eq!(Route::parse("/prompts"), Ok(Route::Prompts));
        assert_eq!(Route::parse("Playground"), Ok(Route::Playground));
        assert_eq!(
            Route::parse("billing"),
            Err(RouteError::UnknownPage("billing".to_string()))
        );
    }
}
