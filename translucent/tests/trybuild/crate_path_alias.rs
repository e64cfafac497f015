use serde::Serialize;
use translucent::{ClassTemplate, Runtime, Translucent};

/// Uses the real crate name as a self-referential alias so no workspace
/// reconfiguration is needed.
#[derive(Default, Serialize, Translucent)]
#[translucent(crate = "translucent", class = "Alias::Counter")]
struct Counter {
    count: u32,
    #[serde(rename = "Total")]
    total: u64,
}

fn main() {
    let mut rt = Runtime::new();
    let class = rt.define_template::<Counter>(&[]);
    let _: translucent::TranslucentResult<translucent::ClassId> = class;
    let _: &'static str = Counter::COUNT;
    let _: &'static str = Counter::CLASS_TOTAL;
    let _: &'static [&'static str] = <Counter as ClassTemplate>::ATTRIBUTES;
}
