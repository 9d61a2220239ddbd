// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

pub mod futures;

#[cfg(test)]
pub mod mock;
