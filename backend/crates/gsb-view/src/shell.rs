//! Top-level screen flow: restore the session, authenticate, show the
//! directory, sign out.

use crate::{
    AuthForm, AuthMode, BusinessForm, Directory, DirectoryView, Notice, ViewError, ViewResult,
    ViewState,
};

use gsb_client::{
    AuthProvider, ChangeFeed, ClientResult, RecordStore, Session, SessionManager, SignUpOutcome,
};
use gsb_core::{BUSINESSES_COLLECTION, Business};

use std::sync::Arc;

use log::{info, warn};

/// Builds a record store acting as the signed-in user
type StoreFactory<S> = Box<dyn Fn(&Session) -> ClientResult<Arc<S>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Persisted session still being restored
    Loading,
    Authenticate,
    Directory,
}

pub struct Shell<A, S, F> {
    sessions: SessionManager<A>,
    store_factory: StoreFactory<S>,
    feed: Arc<F>,
    collection: String,
    directory: Option<Directory<S, F>>,
    view_state: ViewState,
}

impl<A, S, F> Shell<A, S, F>
where
    A: AuthProvider,
    S: RecordStore + 'static,
    F: ChangeFeed + 'static,
{
    pub fn new(
        sessions: SessionManager<A>,
        store_factory: impl Fn(&Session) -> ClientResult<Arc<S>> + Send + Sync + 'static,
        feed: Arc<F>,
    ) -> Self {
        Self {
            sessions,
            store_factory: Box::new(store_factory),
            feed,
            collection: BUSINESSES_COLLECTION.to_string(),
            directory: None,
            view_state: ViewState::new(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn screen(&self) -> Screen {
        if self.directory.is_some() {
            Screen::Directory
        } else if self.sessions.state().is_loading() {
            Screen::Loading
        } else {
            Screen::Authenticate
        }
    }

    pub fn sessions(&self) -> &SessionManager<A> {
        &self.sessions
    }

    pub fn directory(&self) -> Option<&Directory<S, F>> {
        self.directory.as_ref()
    }

    pub fn directory_mut(&mut self) -> Option<&mut Directory<S, F>> {
        self.directory.as_mut()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn view_state_mut(&mut self) -> &mut ViewState {
        &mut self.view_state
    }

    /// Restore the persisted session and mount the directory if signed in.
    pub async fn start(&mut self) -> ViewResult<Screen> {
        if self.sessions.restore().await.is_signed_in() {
            self.mount().await?;
        }
        Ok(self.screen())
    }

    /// Sign in or sign up depending on the form's mode.
    ///
    /// On success the directory is mounted, except when a sign-up still
    /// needs e-mail confirmation.
    pub async fn authenticate(&mut self, form: &AuthForm) -> ViewResult<Notice> {
        let email = form.validate()?;

        match form.mode {
            AuthMode::SignIn => {
                self.sessions.sign_in(email, &form.password).await?;
                self.mount().await?;
                Ok(Notice::success("Signed in successfully"))
            }
            AuthMode::SignUp => match self.sessions.sign_up(email, &form.password).await? {
                SignUpOutcome::SignedIn(_) => {
                    self.mount().await?;
                    Ok(Notice::success("Account created"))
                }
                SignUpOutcome::ConfirmationRequired { email } => Ok(Notice::success(format!(
                    "Check {email} for a confirmation link, then sign in"
                ))),
            },
        }
    }

    /// Discard the list, release the feed and sign out.
    pub async fn sign_out(&mut self) {
        if let Some(directory) = self.directory.take() {
            directory.unmount().await;
        }
        self.view_state.clear();
        self.sessions.sign_out().await;
    }

    /// Keep the signed-in session alive.
    ///
    /// Renewed tokens are handed to the mounted directory's store. A rejected
    /// refresh signs the user out and unmounts the directory.
    pub async fn ensure_session(&mut self) -> ViewResult<()> {
        match self.sessions.ensure_fresh().await {
            Ok(false) => Ok(()),
            Ok(true) => {
                if let (Some(directory), Some(session)) =
                    (self.directory.as_ref(), self.sessions.current_session())
                {
                    directory.renew_session(session);
                }
                Ok(())
            }
            Err(e) => {
                if !self.sessions.state().is_signed_in() {
                    warn!("Session lost, leaving the directory: {e}");
                    if let Some(directory) = self.directory.take() {
                        directory.unmount().await;
                    }
                    self.view_state.clear();
                }
                Err(e.into())
            }
        }
    }

    /// Create a business with a live session
    pub async fn create(&mut self, form: &BusinessForm) -> ViewResult<Business> {
        self.ensure_session().await?;
        self.mounted()?.create(form).await
    }

    pub async fn update(&mut self, record: &Business, form: &BusinessForm) -> ViewResult<Business> {
        self.ensure_session().await?;
        self.mounted()?.update(record, form).await
    }

    pub async fn delete(&mut self, record: &Business) -> ViewResult<()> {
        self.ensure_session().await?;
        self.mounted()?.delete(record).await
    }

    /// Reload the list with a live session
    pub async fn refresh(&mut self) -> ViewResult<()> {
        self.ensure_session().await?;
        self.mounted()?.refresh().await
    }

    /// Render the current list for the signed-in user
    pub fn render(&mut self) -> Option<DirectoryView> {
        let directory = self.directory.as_ref()?;
        let snapshot = directory.snapshot();
        self.view_state.prune(&snapshot);
        Some(DirectoryView::render(&snapshot, Some(directory.identity())))
    }

    fn mounted(&self) -> ViewResult<&Directory<S, F>> {
        self.directory
            .as_ref()
            .ok_or_else(|| ViewError::unauthorized("Sign in to manage businesses"))
    }

    async fn mount(&mut self) -> ViewResult<()> {
        let session = self
            .sessions
            .current_session()
            .ok_or_else(|| ViewError::unauthorized("No active session"))?;
        let identity = session.identity.clone();
        let store = (self.store_factory)(session)?;

        if let Some(previous) = self.directory.take() {
            warn!("Replacing directory of user {}", previous.identity().id);
            previous.unmount().await;
        }
        self.view_state.clear();

        let directory =
            Directory::mount(identity, store, Arc::clone(&self.feed), &self.collection).await?;
        info!("Showing directory for user {}", directory.identity().id);
        self.directory = Some(directory);
        Ok(())
    }
}
