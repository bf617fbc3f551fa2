// Copyright (c) Microsoft Corporation. All rights reserved.
// Licensed under the MIT License.

//! Well-known names and values used by the getting-started scenario.

use azure_core::http::headers::HeaderName;

/// Environment variable holding the account endpoint.
pub const ENDPOINT_ENV_VAR: &str = "AZURE_COSMOS_ENDPOINT";

/// Environment variable holding the account key.
pub const KEY_ENV_VAR: &str = "AZURE_COSMOS_KEY";

/// Endpoint of the local emulator account.
pub const EMULATOR_ENDPOINT: &str = "https://localhost:8081/";

/// Master key of the local emulator account. This key is public and only valid for the emulator.
pub const EMULATOR_KEY: &str =
    "C2y6yDjf5/R+ob0N8A7Cgv30VRDJIWEHLM+4QDU5DE2nQ9nDuVTqobD4b8mGGyPMbIZnqyMsEcaGQy67XIw/Jw==";

/// Identifier of the database created by the scenario.
pub const DATABASE_ID: &str = "FamilyDatabase";

/// Identifier of the container created by the scenario.
pub const CONTAINER_ID: &str = "FamilyContainer";

/// Partition key path of the scenario's container.
pub const PARTITION_KEY_PATH: &str = "/LastName";

/// Manual throughput, in request units per second, provisioned for the scenario's container.
pub const CONTAINER_THROUGHPUT: u32 = 400;

/// Response header reporting the request units an operation consumed.
pub const REQUEST_CHARGE: HeaderName = HeaderName::from_static("x-ms-request-charge");

/// System property carrying an item's entity tag.
pub const ETAG_PROPERTY: &str = "_etag";
