// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — config resolution, the processing gate, and caption
// dispatch.

pub mod config_dir;
pub mod dispatch;
pub mod gate;
