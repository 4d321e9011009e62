// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod amount;
pub mod cli;
pub mod commands;
pub mod convert;
pub mod currency;
pub mod db;
pub mod models;
pub mod rates;
pub mod utils;
