// Copyright (c) Microsoft Corporation. All rights reserved.
// Licensed under the MIT License.

use serde::{Deserialize, Serialize};

/// A family document, partitioned by [`last_name`](FamilyRecord::last_name).
///
/// `(id, last_name)` addresses a single record; the last name must accompany every point operation.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct FamilyRecord {
    #[serde(rename = "id")]
    pub id: String,
    pub last_name: String,
    #[serde(default)]
    pub parents: Vec<Parent>,
    #[serde(default)]
    pub children: Vec<Child>,
    pub address: Address,
    pub is_registered: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Parent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    pub first_name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Child {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    pub first_name: String,
    pub gender: String,
    pub grade: i32,
    #[serde(default)]
    pub pets: Vec<Pet>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Pet {
    pub given_name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    pub state: String,
    pub county: String,
    pub city: String,
}

impl FamilyRecord {
    /// The `Andersen.1` sample family.
    pub fn andersen() -> Self {
        FamilyRecord {
            id: "Andersen.1".into(),
            last_name: "Andersen".into(),
            parents: vec![
                Parent {
                    family_name: None,
                    first_name: "Thomas".into(),
                },
                Parent {
                    family_name: None,
                    first_name: "Mary Kay".into(),
                },
            ],
            children: vec![Child {
                family_name: None,
                first_name: "Henriette Thaulow".into(),
                gender: "female".into(),
                grade: 5,
                pets: vec![Pet {
                    given_name: "Fluffy".into(),
                }],
            }],
            address: Address {
                state: "WA".into(),
                county: "King".into(),
                city: "Seattle".into(),
            },
            is_registered: false,
        }
    }

    /// The `Wakefield.7` sample family.
    pub fn wakefield() -> Self {
        FamilyRecord {
            id: "Wakefield.7".into(),
            last_name: "Wakefield".into(),
            parents: vec![
                Parent {
                    family_name: Some("Wakefield".into()),
                    first_name: "Robin".into(),
                },
                Parent {
                    family_name: Some("Miller".into()),
                    first_name: "Ben".into(),
                },
            ],
            children: vec![
                Child {
                    family_name: Some("Merriam".into()),
                    first_name: "Jesse".into(),
                    gender: "female".into(),
                    grade: 8,
                    pets: vec![
                        Pet {
                            given_name: "Goofy".into(),
                        },
                        Pet {
                            given_name: "Shadow".into(),
                        },
                    ],
                },
                Child {
                    family_name: Some("Miller".into()),
                    first_name: "Lisa".into(),
                    gender: "female".into(),
                    grade: 1,
                    pets: Vec::new(),
                },
            ],
            address: Address {
                state: "NY".into(),
                county: "Manhattan".into(),
                city: "NY".into(),
            },
            is_registered: false,
        }
    }
}
