// Dashboard shell: current page, page-local view state, the open wizard and
// the toast queue every collaborator reports to.

use crate::api::notify::{Notification, NotificationSink, ToastQueue};
use crate::api::playground::{Playground, ResponseGenerator};
use crate::api::submission::SubmissionStrategy;
use crate::filter::{search_prompts, CatalogError, CategoryTabs};
use crate::models::fixtures::{
    CatalogModel, Fixtures, Project, ProjectStatus, PromptCollection, RagModel,
};
use crate::routes::Route;
use crate::wizard::{WizardController, WizardKind};
use log::info;
use std::sync::Arc;
use std::time::Duration;

/// The creation wizard behind a page's primary button.
pub fn page_wizard(route: Route) -> Option<WizardKind> {
    match route {
        Route::Rag => Some(WizardKind::RagPipeline),
        Route::FineTuning => Some(WizardKind::FineTuningProject),
        Route::Models => Some(WizardKind::Model),
        Route::Prompts => Some(WizardKind::Prompt),
        Route::Deploy => Some(WizardKind::Deployment),
        Route::Playground | Route::NotFound => None,
    }
}

/// Label of a page's primary button.
pub fn page_action_label(route: Route) -> Option<&'static str> {
    match route {
        Route::Rag => Some("New RAG Pipeline"),
        Route::FineTuning => Some("New Project"),
        Route::Models => Some("New Model"),
        Route::Prompts => Some("New Prompt"),
        Route::Deploy => Some("New Deployment"),
        Route::Playground | Route::NotFound => None,
    }
}

pub struct Dashboard {
    route: Route,
    fixtures: Fixtures,
    rag_tabs: CategoryTabs,
    model_tabs: CategoryTabs,
    prompt_query: String,
    wizard: Option<WizardController>,
    toasts: Arc<ToastQueue>,
    submitter: Arc<dyn SubmissionStrategy>,
    playground: Playground,
}

impl Dashboard {
    pub fn new(
        fixtures: Fixtures,
        submitter: Arc<dyn SubmissionStrategy>,
        generator: Arc<dyn ResponseGenerator>,
        toast_ttl: Duration,
    ) -> Result<Self, CatalogError> {
        let rag_tabs = CategoryTabs::new(fixtures.rag_categories.clone())?;
        let model_tabs = CategoryTabs::new(fixtures.model_categories.clone())?;
        let playground = Playground::new(fixtures.playground_model_names(), generator);
        Ok(Self {
            route: Route::HOME,
            fixtures,
            rag_tabs,
            model_tabs,
            prompt_query: String::new(),
            wizard: None,
            toasts: Arc::new(ToastQueue::new(toast_ttl)),
            submitter,
            playground,
        })
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    /// Resolve `path` and switch pages. Any open wizard is dismissed.
    pub fn navigate(&mut self, path: &str) -> Route {
        let route = Route::resolve(path);
        self.go_to(route);
        route
    }

    pub fn go_to(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        self.dismiss_wizard();
        info!(
            "[PHASE: dashboard] [STEP: navigate] {} -> {}",
            self.route.path(),
            route.path()
        );
        self.route = route;
    }

    // ---- toasts ----

    pub fn toasts(&self) -> Arc<ToastQueue> {
        Arc::clone(&self.toasts)
    }

    pub fn notify(&self, notification: Notification) {
        self.toasts.notify(notification);
    }

    // ---- wizard ----

    /// Open a fresh wizard, replacing any previous one.
    pub fn open_wizard(&mut self, kind: WizardKind) -> &mut WizardController {
        self.dismiss_wizard();
        let sink: Arc<dyn NotificationSink> = self.toasts.clone();
        self.wizard
            .insert(WizardController::new(kind, Arc::clone(&self.submitter), sink))
    }

    /// Open the wizard behind the current page's primary button.
    pub fn open_page_wizard(&mut self) -> Option<&mut WizardController> {
        let kind = page_wizard(self.route)?;
        Some(self.open_wizard(kind))
    }

    pub fn wizard(&self) -> Option<&WizardController> {
        self.wizard.as_ref()
    }

    pub fn wizard_mut(&mut self) -> Option<&mut WizardController> {
        self.wizard.as_mut()
    }

    /// Cancel and drop the open wizard, if any.
    pub fn dismiss_wizard(&mut self) {
        if let Some(mut wizard) = self.wizard.take() {
            wizard.cancel();
        }
    }

    /// Drop the wizard once it has closed itself (successful submission).
    pub fn reap_wizard(&mut self) -> bool {
        if self.wizard.as_ref().map(|w| w.is_closed()).unwrap_or(false) {
            self.wizard = None;
            return true;
        }
        false
    }

    // ---- page views ----

    pub fn rag_tabs(&self) -> &CategoryTabs {
        &self.rag_tabs
    }

    pub fn rag_tabs_mut(&mut self) -> &mut CategoryTabs {
        &mut self.rag_tabs
    }

    pub fn model_tabs(&self) -> &CategoryTabs {
        &self.model_tabs
    }

    pub fn model_tabs_mut(&mut self) -> &mut CategoryTabs {
        &mut self.model_tabs
    }

    pub fn visible_rag_models(&self) -> Vec<&RagModel> {
        self.rag_tabs.filter(&self.fixtures.rag_models)
    }

    pub fn visible_models(&self) -> Vec<&CatalogModel> {
        self.model_tabs.filter(&self.fixtures.models)
    }

    pub fn prompt_query(&self) -> &str {
        &self.prompt_query
    }

    pub fn prompt_query_mut(&mut self) -> &mut String {
        &mut self.prompt_query
    }

    pub fn visible_prompts(&self) -> Vec<&PromptCollection> {
        search_prompts(&self.fixtures.prompt_collections, &self.prompt_query)
    }

    pub fn playground(&self) -> &Playground {
        &self.playground
    }

    pub fn playground_mut(&mut self) -> &mut Playground {
        &mut self.playground
    }

    // ---- card actions ----

    /// Fine-tuning project card. Only completed and training projects react.
    pub fn activate_project(&mut self, id: u32) -> Option<Notification> {
        let project: &Project = self.fixtures.project(id)?;
        let notification = match project.status {
            ProjectStatus::Completed => Notification::new(
                "Opening in Playground",
                format!("Opening {} in the playground.", project.name),
            ),
            ProjectStatus::Training => Notification::new(
                "Training Details",
                format!("Viewing details for {}.", project.name),
            ),
            ProjectStatus::Paused => return None,
        };
        self.notify(notification.clone());
        Some(notification)
    }

    /// Model card "Fine-tune" button.
    pub fn fine_tune_model(&mut self, title: &str) -> Notification {
        let notification = Notification::new(
            "Fine-tuning Model",
            format!("Starting fine-tuning for {}", title),
        );
        self.notify(notification.clone());
        self.go_to(Route::FineTuning);
        notification
    }

    /// Model card "Open in Playground" button.
    pub fn open_model_in_playground(&mut self, title: &str) -> Notification {
        let notification = Notification::new(
            "Opening in Playground",
            format!("Opening {} in the Playground", title),
        );
        self.notify(notification.clone());
        self.playground.select_model(title);
        self.go_to(Route::Playground);
        notification
    }

    /// RAG model card: opens the pipeline wizard.
    pub fn activate_rag_model(&mut self) -> &mut WizardController {
        self.open_wizard(WizardKind::RagPipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::playground::SimulatedGenerator;
    use crate::api::submission::SimulatedSubmitter;
    use crate::wizard::{FieldValue, WizardPhase};

    fn dashboard() -> Dashboard {
        Dashboard::new(
            Fixtures::builtin(),
            Arc::new(SimulatedSubmitter::new(Duration::ZERO)),
            Arc::new(SimulatedGenerator::new(Duration::ZERO)),
            Duration::from_secs(60),
        )
        .unwrap()
    }

    #[test]
    fn starts_on_rag_and_navigates() {
        let mut d = dashboard();
        assert_eq!(d.route(), Route::Rag);
        assert_eq!(d.navigate("/deploy/"), Route::Deploy);
        assert_eq!(d.navigate("/nowhere"), Route::NotFound);
        assert_eq!(d.navigate("/"), Route::Rag);
    }

    #[test]
    fn rag_page_defaults_to_first_tab() {
        let d = dashboard();
        let titles: Vec<&str> = d.visible_rag_models().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles.len(), 5);
        assert!(titles.iter().all(|t| !t.contains("model 2")));
    }

    #[test]
    fn opening_a_wizard_replaces_the_previous_one() {
        let mut d = dashboard();
        d.open_wizard(WizardKind::Prompt)
            .set_field("promptName", FieldValue::text("Old"))
            .unwrap();
        let w = d.open_wizard(WizardKind::Prompt);
        assert!(w.draft().is_empty());
        assert_eq!(w.phase(), WizardPhase::Step(1));
        assert!(d.toasts().snapshot().is_empty());
    }

    #[test]
    fn navigation_dismisses_open_wizard() {
        let mut d = dashboard();
        d.open_page_wizard().unwrap();
        d.go_to(Route::Playground);
        assert!(d.wizard().is_none());
        assert!(d.open_page_wizard().is_none());
    }

    #[tokio::test]
    async fn wizard_submission_lands_in_toast_queue() {
        let mut d = dashboard();
        d.go_to(Route::FineTuning);
        {
            let w = d.open_page_wizard().unwrap();
            w.set_field("projectName", FieldValue::text("Demo")).unwrap();
            while !w.is_closed() {
                w.advance().await.unwrap();
            }
        }
        assert!(d.reap_wizard());

        let toasts = d.toasts().active();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Fine-Tuning Project Created");
    }

    #[test]
    fn project_cards_react_by_status() {
        let mut d = dashboard();
        let n = d.activate_project(2).unwrap();
        assert_eq!(n.title, "Opening in Playground");
        assert_eq!(n.description, "Opening Content Moderation in the playground.");

        let n = d.activate_project(1).unwrap();
        assert_eq!(n.title, "Training Details");
        assert_eq!(n.description, "Viewing details for Customer Support Bot.");

        assert!(d.activate_project(3).is_none());
        assert!(d.activate_project(99).is_none());
        assert_eq!(d.toasts().snapshot().len(), 2);
    }

    #[test]
    fn model_card_actions_navigate() {
        let mut d = dashboard();
        d.go_to(Route::Models);
        let n = d.open_model_in_playground("Qwen2.5-Coder-7B");
        assert_eq!(n.description, "Opening Qwen2.5-Coder-7B in the Playground");
        assert_eq!(d.route(), Route::Playground);
        assert_eq!(d.playground().selected_model(), "Qwen2.5-Coder-7B");

        d.fine_tune_model("Gemma-2-2b-it");
        assert_eq!(d.route(), Route::FineTuning);
    }

    #[test]
    fn every_page_but_playground_has_a_wizard() {
        for route in Route::PAGES {
            assert_eq!(
                page_wizard(route).is_some(),
                route != Route::Playground,
                "{:?}",
                route
            );
            assert_eq!(page_wizard(route).is_some(), page_action_label(route).is_some());
        }
    }
}
