//! Hash routing (`#/`, `#/leaderboard`, `#/<game-slug>`)

use crate::games::GameKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Leaderboard,
    Game(GameKind),
    NotFound,
}

impl Route {
    /// Parse a path (`/snake`) or a location hash (`#/snake`)
    pub fn parse(raw: &str) -> Self {
        let path = raw.trim().trim_start_matches('#');
        let path = path.trim_start_matches('/').trim_end_matches('/');
        if path.is_empty() {
            return Route::Home;
        }
        if path.eq_ignore_ascii_case("leaderboard") {
            return Route::Leaderboard;
        }
        GameKind::from_slug(path).map_or(Route::NotFound, Route::Game)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Leaderboard => "/leaderboard".to_string(),
            Route::Game(kind) => format!("/{}", kind.slug()),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// Value for `location.hash`
    pub fn hash(&self) -> String {
        format!("#{}", self.path())
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Retro Arcade",
            Route::Leaderboard => "Leaderboard",
            Route::Game(kind) => kind.name(),
            Route::NotFound => "Not Found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_variants() {
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("#"), Route::Home);
        assert_eq!(Route::parse("#/"), Route::Home);
    }

    #[test]
    fn test_known_routes() {
        assert_eq!(Route::parse("#/leaderboard"), Route::Leaderboard);
        assert_eq!(Route::parse("/space-invaders"), Route::Game(GameKind::SpaceInvaders));
        assert_eq!(Route::parse("#/qbert"), Route::Game(GameKind::Qbert));
    }

    #[test]
    fn test_trailing_slash_and_case() {
        assert_eq!(Route::parse("#/Dig-Dug/"), Route::Game(GameKind::DigDug));
        assert_eq!(Route::parse("/LEADERBOARD/"), Route::Leaderboard);
    }

    #[test]
    fn test_unknown_path() {
        assert_eq!(Route::parse("#/solitaire"), Route::NotFound);
        assert_eq!(Route::parse("/snake/extra"), Route::NotFound);
    }

    #[test]
    fn test_path_round_trip() {
        let mut routes = vec![Route::Home, Route::Leaderboard];
        routes.extend(GameKind::ALL.into_iter().map(Route::Game));
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
            assert_eq!(Route::parse(&route.hash()), route);
        }
    }
}
