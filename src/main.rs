use barrage::error::AppResult;

fn main() -> AppResult<()> {
    barrage::run()
}
