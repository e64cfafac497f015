use serde::Serialize;

mod runtime {
    pub use translucent::*;
}

/// Routes generated paths through a re-exporting module.
#[derive(Default, Serialize, runtime::Translucent)]
#[translucent(crate = "crate::runtime")]
struct Lamp {
    lit: bool,
}

fn main() {
    let template = <Lamp as runtime::ClassTemplate>::template();
    let _: runtime::TranslucentResult<runtime::serde_json::Value> = template;
    let _: &'static str = Lamp::LIT;
}
