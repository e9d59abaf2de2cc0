//! User record types exchanged with the remote service.
//!
//! - [`User`]: a record as held by the store, identifier included
//! - [`UserDraft`]: a record before the service has assigned an identifier
//! - [`UserPatch`]: a partial record, used for update requests and responses
//!
use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, deserialize_with = "null_as_default")]
    pub street: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A user record as returned by the remote service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: Address,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: Company,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
}

/// A record that has not been created yet. Built by `app::form::UserForm::validate`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub address: Address,
    pub company: Company,
    pub website: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Partial record. Absent fields are left untouched by [`User::merge`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl User {
    /// Attach a service-assigned identifier to a draft.
    pub fn from_draft(id: u64, draft: UserDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            username: draft.username,
            address: draft.address,
            company: draft.company,
            website: draft.website,
        }
    }

    /// Overwrite the fields present in `patch`, nested groups member by member.
    pub fn merge(&mut self, patch: &UserPatch) {
        fn set(dst: &mut String, src: &Option<String>) {
            if let Some(v) = src {
                dst.clone_from(v);
            }
        }
        set(&mut self.name, &patch.name);
        set(&mut self.email, &patch.email);
        set(&mut self.phone, &patch.phone);
        set(&mut self.username, &patch.username);
        set(&mut self.website, &patch.website);
        if let Some(addr) = &patch.address {
            set(&mut self.address.street, &addr.street);
            set(&mut self.address.city, &addr.city);
        }
        if let Some(company) = &patch.company {
            set(&mut self.company.name, &company.name);
        }
    }
}

impl From<UserDraft> for UserPatch {
    fn from(d: UserDraft) -> Self {
        Self {
            name: Some(d.name),
            email: Some(d.email),
            phone: Some(d.phone),
            username: Some(d.username),
            address: Some(AddressPatch {
                street: Some(d.address.street),
                city: Some(d.address.city),
            }),
            company: Some(CompanyPatch {
                name: Some(d.company.name),
            }),
            website: Some(d.website),
        }
    }
}

/// Username suggested for a record without one: `USER-` plus the first word of the name.
pub fn default_username(name: Option<&str>) -> String {
    match name {
        Some(n) if !n.is_empty() => {
            let first = n.split(' ').next().unwrap_or("");
            format!("USER-{first}")
        }
        _ => "USER-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: 5,
            name: "Clark Kent".into(),
            email: "clark@dailyplanet.com".into(),
            phone: "555-0100".into(),
            username: "superman".into(),
            address: Address { street: "344 Clinton St".into(), city: "Smallville".into() },
            company: Company { name: "Daily Planet".into() },
            website: "dailyplanet.com".into(),
        }
    }

    #[test]
    fn default_username_uses_first_word() {
        assert_eq!(default_username(Some("Jane Doe")), "USER-Jane");
        assert_eq!(default_username(Some("Cher")), "USER-Cher");
    }

    #[test]
    fn default_username_without_name() {
        assert_eq!(default_username(None), "USER-");
        assert_eq!(default_username(Some("")), "USER-");
        assert_eq!(default_username(Some(" leading")), "USER-");
    }

    #[test]
    fn merge_nested_city_only() {
        let mut u = sample();
        let patch = UserPatch {
            address: Some(AddressPatch { street: None, city: Some("Metropolis".into()) }),
            ..Default::default()
        };
        u.merge(&patch);
        assert_eq!(u.address.city, "Metropolis");
        assert_eq!(u.address.street, "344 Clinton St");
        assert_eq!(u.name, "Clark Kent");
        assert_eq!(u.company.name, "Daily Planet");
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let json = r#"{
            "id": 1, "name": "Leanne Graham", "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {"street": "Kulas Light", "suite": "Apt. 556", "city": "Gwenborough",
                        "zipcode": "92998-3874", "geo": {"lat": "-37.3159", "lng": "81.1496"}},
            "phone": "1-770-736-8031 x56442", "website": "hildegard.org",
            "company": {"name": "Romaguera-Crona", "catchPhrase": "x", "bs": "y"}
        }"#;
        let u: User = serde_json::from_str(json).expect("decode");
        assert_eq!(u.id, 1);
        assert_eq!(u.address.city, "Gwenborough");
        assert_eq!(u.company.name, "Romaguera-Crona");
    }

    #[test]
    fn decode_treats_null_like_missing() {
        let json = r#"{"id": 1, "name": "A", "email": "a@b.c", "phone": null,
                       "address": {"street": null, "city": "Gotham"}, "company": null, "website": null}"#;
        let u: User = serde_json::from_str(json).expect("decode");
        assert_eq!(u.phone, "");
        assert_eq!(u.address.street, "");
        assert_eq!(u.address.city, "Gotham");
        assert_eq!(u.company, Company::default());
        assert_eq!(u.website, "");
        assert_eq!(u.username, "");
    }

    #[test]
    fn partial_patch_serializes_only_present_fields() {
        let patch = UserPatch {
            address: Some(AddressPatch { street: None, city: Some("Metropolis".into()) }),
            ..Default::default()
        };
        let v = serde_json::to_value(&patch).expect("encode");
        assert_eq!(v, serde_json::json!({"address": {"city": "Metropolis"}}));
    }
}
