use comfy_table::Table;
use waypath_core::waypoint::Waypoint;

pub fn cities_table(cities: &[Waypoint]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Name", "Latitude", "Longitude"]);

    for city in cities {
        table.add_row(vec![
            city.name().to_string(),
            format!("{:.4}", city.latitude()),
            format!("{:.4}", city.longitude()),
        ]);
    }

    table
}
