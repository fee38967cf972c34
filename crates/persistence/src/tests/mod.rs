// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.


use crate::Persistence;

pub fn test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}
