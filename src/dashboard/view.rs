use std::sync::Arc;

use super::Redirect;
use crate::models::{Restaurant, RestaurantDraft};
use crate::session::SessionStore;
use crate::store::RestaurantStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Unauthenticated,
    Loading,
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantForm {
    pub cnpj: String,
    pub name: String,
    pub state: String,
    pub city: String,
    pub kind: String,
    pub operating_hours: String,
    pub postal_code: String,
    pub street_number: String,
    pub endereco: String,
}

impl RestaurantForm {
    pub fn from_restaurant(restaurant: &Restaurant) -> Self {
        Self {
            cnpj: restaurant.cnpj.clone(),
            name: restaurant.name.clone(),
            state: restaurant.state.clone(),
            city: restaurant.city.clone(),
            kind: restaurant.kind.clone(),
            operating_hours: restaurant.operating_hours.clone(),
            postal_code: restaurant.postal_code.clone(),
            street_number: restaurant.street_number.clone(),
            endereco: restaurant.endereco.clone(),
        }
    }

    pub fn to_draft(&self) -> RestaurantDraft {
        RestaurantDraft {
            cnpj: self.cnpj.clone(),
            name: self.name.clone(),
            state: self.state.clone(),
            city: self.city.clone(),
            kind: self.kind.clone(),
            operating_hours: self.operating_hours.clone(),
            postal_code: self.postal_code.clone(),
            street_number: self.street_number.clone(),
            endereco: self.endereco.clone(),
        }
    }
}

pub struct DashboardView {
    store: Arc<dyn RestaurantStore>,
    session: Arc<dyn SessionStore>,
    state: ViewState,
    restaurants: Vec<Restaurant>,
    form: RestaurantForm,
    editing_id: Option<i64>,
}

impl DashboardView {
    pub fn new(store: Arc<dyn RestaurantStore>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            session,
            state: ViewState::Unauthenticated,
            restaurants: Vec::new(),
            form: RestaurantForm::default(),
            editing_id: None,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn form(&self) -> &RestaurantForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RestaurantForm {
        &mut self.form
    }

    pub fn editing_id(&self) -> Option<i64> {
        self.editing_id
    }

    /// Redirects to login when no token is stored; the store is never touched
    /// in that case.
    pub async fn mount(&mut self) -> Option<Redirect> {
        if self.session.token().is_none() {
            self.state = ViewState::Unauthenticated;
            return Some(Redirect::Login);
        }

        self.state = ViewState::Loading;
        match self.store.list().await {
            Ok(rows) => {
                self.restaurants = rows;
                self.state = ViewState::Idle;
            }
            Err(err) => {
                tracing::error!("failed to load restaurants: {err}");
            }
        }
        None
    }

    pub async fn submit(&mut self) {
        if self.state != ViewState::Idle {
            return;
        }
        self.state = ViewState::Submitting;

        let draft = self.form.to_draft();
        let outcome = match self.editing_id {
            Some(id) => self.store.update(id, draft).await.map(|_| ()),
            None => self.store.create(draft).await.map(|_| ()),
        };

        match outcome {
            Ok(()) => {
                self.form = RestaurantForm::default();
                self.editing_id = None;
                self.refresh().await;
            }
            Err(err) => {
                tracing::error!("failed to save restaurant: {err}");
            }
        }
        self.state = ViewState::Idle;
    }

    pub fn begin_edit(&mut self, id: i64) -> bool {
        match self.restaurants.iter().find(|r| r.id == id) {
            Some(restaurant) => {
                self.form = RestaurantForm::from_restaurant(restaurant);
                self.editing_id = Some(id);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.form = RestaurantForm::default();
        self.editing_id = None;
    }

    pub async fn delete(&mut self, id: i64) {
        if self.state != ViewState::Idle {
            return;
        }
        match self.store.delete(id).await {
            Ok(()) => self.refresh().await,
            Err(err) => {
                tracing::error!("failed to delete restaurant {id}: {err}");
            }
        }
    }

    pub async fn refresh(&mut self) {
        match self.store.list().await {
            Ok(rows) => self.restaurants = rows,
            Err(err) => {
                tracing::error!("failed to refresh restaurants: {err}");
            }
        }
    }

    pub fn logout(&mut self) -> Redirect {
        if let Err(err) = self.session.clear_token() {
            tracing::error!("failed to clear session token: {err:#}");
        }
        self.state = ViewState::Unauthenticated;
        Redirect::Login
    }
}
