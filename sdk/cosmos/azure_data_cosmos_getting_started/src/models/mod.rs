// Copyright (c) Microsoft Corporation. All rights reserved.
// Licensed under the MIT License.

//! Documents stored by the walkthrough.

mod family;

pub use family::*;
