#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    shelf_ngin::flow::run(shelf_ngin::SceneConfig::default())
}

// The web build starts through the library's `wasm_bindgen(start)` hook.
#[cfg(target_arch = "wasm32")]
fn main() {}
