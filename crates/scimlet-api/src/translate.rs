//! Mapping between the SCIM wire model and the stored user model.
//!
//! Pure field-by-field conversions. The wire `id` and `schemas` have no
//! stored counterpart: the id is assigned by the store and the schema list
//! is protocol metadata.

use scimlet_core::user::{Email, NewUser, User};

use crate::wire::{ScimEmail, ScimName, ScimUser, USER_SCHEMA};

impl From<&User> for ScimUser {
  fn from(u: &User) -> Self {
    ScimUser {
      schemas:      vec![USER_SCHEMA.to_string()],
      id:           Some(u.id.to_string()),
      external_id:  u.external_id.clone(),
      user_name:    u.user_name.clone(),
      name:         ScimName {
        given_name:  u.first_name.clone(),
        family_name: u.last_name.clone(),
        middle_name: u.middle_name.clone(),
      },
      display_name: u.display_name.clone(),
      emails:       u.emails.iter().map(ScimEmail::from).collect(),
      active:       u.active,
    }
  }
}

/// Any `id` or `schemas` on the inbound resource is dropped.
impl From<ScimUser> for NewUser {
  fn from(w: ScimUser) -> Self {
    NewUser {
      external_id:  w.external_id,
      user_name:    w.user_name,
      first_name:   w.name.given_name,
      middle_name:  w.name.middle_name,
      last_name:    w.name.family_name,
      display_name: w.display_name,
      active:       w.active,
      emails:       w.emails.into_iter().map(Email::from).collect(),
    }
  }
}

impl From<&Email> for ScimEmail {
  fn from(e: &Email) -> Self {
    ScimEmail {
      value:   e.value.clone(),
      kind:    e.kind.clone(),
      primary: e.primary,
    }
  }
}

impl From<ScimEmail> for Email {
  fn from(e: ScimEmail) -> Self {
    Email {
      kind:    e.kind,
      value:   e.value,
      primary: e.primary,
    }
  }
}
