// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Datagram transport seam between the bridge and the upstream application.

use std::future::Future;
use std::pin::Pin;

use crate::error::TransportError;

/// Alias to reduce type complexity in Transport.
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<(), TransportError>> + Send + 'a>>;

/// Moves raw datagrams to a fixed peer and from a bound local address.
pub trait Transport: Send + Sync {
    /// Deliver one datagram to the peer. Failures are never retried.
    fn send<'a>(&'a self, packet: &'a [u8]) -> SendFuture<'a>;

    /// Take one pending datagram without blocking.
    fn try_receive(&self) -> Result<Option<Vec<u8>>, TransportError>;
}
