use pacman::EngineBuilder;

fn main() {
    let assets = std::env::args().nth(1).unwrap_or_else(|| "assets".to_string());
    EngineBuilder::new().with_asset_dir(assets).build().run();
}
