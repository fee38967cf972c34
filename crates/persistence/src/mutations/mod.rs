// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side operations, one module per table concern.

pub mod accounts;
pub mod audit;
pub mod notifications;
pub mod requests;
pub mod sessions;
