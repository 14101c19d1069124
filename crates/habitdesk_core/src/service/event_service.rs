//! Calendar event use-case service.

use super::{resolve_category, ServiceError, ServiceResult};
use crate::model::event::{Event, EventId};
use crate::model::owner::OwnerId;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::event_repo::EventRepository;
use crate::validation::event::{validate_event, EventInput};
use log::info;
use uuid::Uuid;

pub struct EventService<E: EventRepository, C: CategoryRepository> {
    events: E,
    categories: C,
}

impl<E: EventRepository, C: CategoryRepository> EventService<E, C> {
    pub fn new(events: E, categories: C) -> Self {
        Self { events, categories }
    }

    /// Creates one event; without a category it lands in the inbox.
    pub fn create_event(&self, owner_id: OwnerId, input: &EventInput) -> ServiceResult<Event> {
        let (category_id, category_known) =
            resolve_category(&self.categories, owner_id, input.category_id)?;
        let validated = validate_event(input, category_known)?;

        let event = Event {
            id: Uuid::new_v4(),
            owner_id,
            category_id,
            title: validated.title,
            description: validated.description,
            location: validated.location,
            start_at: validated.start_at,
            end_at: validated.end_at,
        };
        self.events.create_event(&event)?;
        info!("event=event_create module=service status=ok event_id={}", event.id);
        Ok(event)
    }

    pub fn update_event(
        &self,
        owner_id: OwnerId,
        id: EventId,
        input: &EventInput,
    ) -> ServiceResult<Event> {
        if self.events.get_event(owner_id, id)?.is_none() {
            return Err(ServiceError::NotFound { entity: "event", id });
        }
        let (category_id, category_known) =
            resolve_category(&self.categories, owner_id, input.category_id)?;
        let validated = validate_event(input, category_known)?;

        let event = Event {
            id,
            owner_id,
            category_id,
            title: validated.title,
            description: validated.description,
            location: validated.location,
            start_at: validated.start_at,
            end_at: validated.end_at,
        };
        self.events.update_event(&event)?;
        info!("event=event_update module=service status=ok event_id={id}");
        Ok(event)
    }

    pub fn get_event(&self, owner_id: OwnerId, id: EventId) -> ServiceResult<Option<Event>> {
        Ok(self.events.get_event(owner_id, id)?)
    }

    /// Lists the owner's events by start time, optionally filtered by text.
    pub fn list_events(&self, owner_id: OwnerId, q: Option<&str>) -> ServiceResult<Vec<Event>> {
        Ok(self.events.list_events(owner_id, q)?)
    }

    pub fn delete_event(&self, owner_id: OwnerId, id: EventId) -> ServiceResult<()> {
        self.events.delete_event(owner_id, id)?;
        info!("event=event_delete module=service status=ok event_id={id}");
        Ok(())
    }
}
