//! Built-in example collection used to populate an empty `games` store.

use crate::catalog::types::{Game, ImageRef, NewGame};

/// Ids of the seeded examples, in display order.
pub const EXAMPLE_GAME_IDS: [i64; 5] = [1, 2, 3, 4, 5];

pub fn example_games() -> Vec<Game> {
    vec![
        NewGame::new("Catan", 3, 4, 90)
            .with_description("Juego de estrategia donde los jugadores recolectan recursos y construyen asentamientos.")
            .with_image(ImageRef::Remote("https://assetsio.gnwcdn.com/catan-board-game-gameplay-layout-settlements-roads-robber.jpeg?width=690&quality=70&format=jpg&auto=webp".into()))
            .with_link("https://devir.es/catan")
            .with_category("Estratégico")
            .into_game(1),
        NewGame::new("Dixit", 3, 6, 30)
            .with_description("Juego de imaginación y creatividad donde los jugadores dan pistas sobre ilustraciones oníricas.")
            .with_image(ImageRef::Remote("https://juegosdemesayrol.com/wp-content/uploads/Dixit-1-1.jpg".into()))
            .with_link("https://zacatrus.es/dixit.html")
            .with_category("Familiar")
            .into_game(2),
        NewGame::new("Código Secreto", 2, 8, 15)
            .with_description("Juego de palabras donde dos equipos compiten para encontrar a todos sus agentes secretos.")
            .with_image(ImageRef::Remote("https://i0.wp.com/losjuegossobrelamesa.com/wp-content/uploads/Tablero2.jpg?fit=820%2C507&ssl=1".into()))
            .with_link("https://devir.es/codigo-secreto")
            .with_category("Party")
            .into_game(3),
        NewGame::new("Aventureros al tren", 2, 5, 60)
            .with_description("Juego de construir rutas de tren a través de Norteamérica recolectando cartas de colores.")
            .with_image(ImageRef::Remote("https://juegosdemesayrol.com/wp-content/uploads/C8A9209.jpg".into()))
            .with_link("https://zacatrus.es/aventureros-al-tren-europa.html")
            .with_category("Familiar")
            .into_game(4),
        NewGame::new("7 Wonders", 2, 7, 30)
            .with_description("Juego de cartas de drafting donde los jugadores construyen una civilización a lo largo de tres eras.")
            .with_image(ImageRef::Remote("https://tabletopterrain.com/cdn/shop/files/tabletop-terrain-board-game-insert-7-wonders-2nd-edition-with-expansions-board-game-insert-organizer-39610962804963.webp?v=1683486676&width=1214".into()))
            .with_link("https://zacatrus.es/7-wonders-nueva-edicion.html")
            .with_category("Estratégico")
            .into_game(5),
    ]
}
